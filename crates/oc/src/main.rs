mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use oc_core::Session;

use crate::cli::{Cli, Command};
use crate::error::{CliError, failed};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.global.verbose;

    init_tracing(verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        if verbose > 0 {
            eprintln!("{:?}", miette::Report::new(err));
        } else {
            eprintln!("{err}");
        }
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    // Completions need neither settings nor a server
    if let Command::Completions(args) = &command {
        use clap::CommandFactory;

        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "oc", &mut std::io::stdout());
        return Ok(());
    }

    let loaded = config::load(&global)?;

    if let Command::Config(args) = &command {
        return commands::config_cmd::handle(args, &loaded);
    }

    // `config` already prints the same lines on stdout
    if global.verbose > 0 {
        config::echo(&loaded);
    }

    let session =
        Session::new(config::session_config(&loaded)?).map_err(failed("start session"))?;

    tracing::debug!(server = session.config().framework_server_str(), "dispatching command");
    commands::dispatch(command, &session, &loaded.settings, &global).await
}
