//! Domain layer between `oc-api` and the `oc` command line.
//!
//! - **[`Session`]**: one authenticated handle per invocation, built from an
//!   explicit [`SessionConfig`]. Every operation is a single REST round
//!   trip; nothing is cached.
//! - **[`Monitor`]**: live MQTT subscription that streams messages into a
//!   [`MessageSink`] until cancelled.
//! - **Domain model** ([`model`]): users, groups, services, devices and
//!   service tokens, converted from the wire types in [`convert`].

pub mod config;
pub mod convert;
pub mod env;
pub mod error;
pub mod model;
pub mod monitor;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{SessionConfig, mask_secret};
pub use env::service_env_lines;
pub use error::CoreError;
pub use model::{
    Device, Group, GroupAccess, GroupMembership, Owner, Service, ServiceToken, User,
    node::subtree_topic,
};
pub use monitor::{DrainEnd, LineSink, MessageSink, Monitor, drain};
pub use session::Session;
