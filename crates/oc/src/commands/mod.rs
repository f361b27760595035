//! Command dispatch: bridges CLI args -> session calls -> output formatting.

pub mod config_cmd;
pub mod device;
pub mod group;
pub mod monitor;
pub mod service;
pub mod user;
pub mod util;

use oc_config::Settings;
use oc_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    session: &Session,
    settings: &Settings,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::User(args) => user::handle(session, settings, args, global).await,
        Command::Group(args) => group::handle(session, args, global).await,
        Command::Service(args) => service::handle(session, args, global).await,
        Command::Device(args) => device::handle(session, args, global).await,
        Command::Monitor(args) => monitor::stream(session, args.topics).await,
        // Config and Completions never reach the server
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
