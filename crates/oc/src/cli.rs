//! Clap derive structures for the `oc` CLI.
//!
//! Defines the complete command tree and global flags. This file is also
//! compiled by `build.rs` for man page generation, so it must only depend
//! on clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// oc -- administer an OpenChirp framework server
#[derive(Debug, Parser)]
#[command(
    name = "oc",
    version,
    about = "Administer an OpenChirp IoT framework server",
    long_about = "Manage users, groups, services, service tokens and devices on an \
        OpenChirp framework server, and watch live MQTT traffic.\n\n\
        Settings come from flags, then FRAMEWORK_SERVER / AUTH_ID / AUTH_TOKEN, \
        then the first occonfig file found in the working directory, /etc/oc, \
        ~/.config/oc or ~/.oc.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Framework server URL [default: http://localhost]
    #[arg(long, short = 's', env = "FRAMEWORK_SERVER", global = true)]
    pub framework_server: Option<String>,

    /// MQTT server URI [default: tcp://localhost:1883]
    #[arg(long, short = 'm', global = true)]
    pub mqtt_server: Option<String>,

    /// User email or service id to authenticate as
    #[arg(long, short = 'i', env = "AUTH_ID", global = true)]
    pub auth_id: Option<String>,

    /// Password or service token
    #[arg(
        long,
        short = 't',
        env = "AUTH_TOKEN",
        global = true,
        hide_env_values = true
    )]
    pub auth_token: Option<String>,

    /// Output format for list commands
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Echo resolved settings to stderr; repeat for more log detail
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage users
    User(UserArgs),

    /// Manage groups
    Group(GroupArgs),

    /// Manage services and their security tokens
    Service(ServiceArgs),

    /// Inspect devices
    Device(DeviceArgs),

    /// Print every message published on the given topics
    Monitor(MonitorArgs),

    /// Show the resolved configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── User ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show the authenticated user's profile
    Info,

    /// List all users
    #[command(alias = "list")]
    Ls,

    /// Create a user
    Create {
        /// Email address, also the login id
        email: String,

        /// Initial password
        password: String,

        /// Display name
        name: Option<String>,

        /// Print an occonfig snippet for the new user
        #[arg(long, short = 'c')]
        occonfig: bool,
    },
}

// ── Group ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// List all groups
    #[command(alias = "list")]
    Ls,

    /// Create a group
    Create {
        /// Group name
        name: String,
    },
}

// ── Service ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[command(subcommand)]
    pub command: ServiceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// List all services
    #[command(alias = "list")]
    Ls,

    /// Create a service and print its id
    Create {
        /// Service name
        name: String,

        /// What the service does
        description: String,
    },

    /// Delete a service
    #[command(visible_alias = "delete")]
    Rm {
        /// Service id
        id: String,
    },

    /// Manage a service's security token
    Token(TokenArgs),

    /// Print every message published under a service's topic
    Monitor {
        /// Service id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[command(subcommand)]
    pub command: TokenCommand,
}

#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Create the service's token (fails if one exists)
    Generate {
        /// Service id
        id: String,

        /// Print FRAMEWORK_SERVER/MQTT_SERVER/SERVICE_ID/SERVICE_TOKEN lines
        #[arg(long)]
        env: bool,
    },

    /// Replace the service's token
    Regenerate {
        /// Service id
        id: String,

        /// Print FRAMEWORK_SERVER/MQTT_SERVER/SERVICE_ID/SERVICE_TOKEN lines
        #[arg(long)]
        env: bool,
    },

    /// Remove the service's token
    #[command(visible_alias = "delete")]
    Rm {
        /// Service id
        id: String,
    },
}

// ── Device ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// List all devices
    #[command(alias = "list")]
    Ls,

    /// Print every message published under a device's topic
    Monitor {
        /// Device id
        id: String,
    },
}

// ── Monitor ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Topic filters, MQTT wildcards allowed
    #[arg(required = true, num_args = 1..)]
    pub topics: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Print as occonfig file lines instead (token unmasked)
    #[arg(long, short = 'c')]
    pub occonfig: bool,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
