//! CLI error types with miette diagnostics.
//!
//! Every handler failure reads `Failed to <operation>: <cause>`. The
//! variant is picked from the underlying `CoreError` so the help text can
//! point at the setting that most likely needs fixing.

use miette::Diagnostic;
use thiserror::Error;

use oc_config::ConfigError;
use oc_core::CoreError;

/// Exit codes. Usage errors exit with 2 from clap before any handler runs.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Framework server ─────────────────────────────────────────────
    #[error("Failed to {operation}: {source}")]
    #[diagnostic(
        code(oc::auth_failed),
        help(
            "Check the credentials in --auth-id/--auth-token, AUTH_ID/AUTH_TOKEN \
             or the occonfig file. Run `oc config` to see what was used."
        )
    )]
    AuthFailed {
        operation: String,
        #[source]
        source: CoreError,
    },

    #[error("Failed to {operation}: {source}")]
    #[diagnostic(
        code(oc::unreachable),
        help("Is the framework server running? Set it with --framework-server or FRAMEWORK_SERVER.")
    )]
    Unreachable {
        operation: String,
        #[source]
        source: CoreError,
    },

    #[error("Failed to {operation}: {source}")]
    #[diagnostic(code(oc::not_found), help("List what exists with the matching `ls` command."))]
    NotFound {
        operation: String,
        #[source]
        source: CoreError,
    },

    #[error("Failed to {operation}: {source}")]
    #[diagnostic(code(oc::api_error))]
    Api {
        operation: String,
        #[source]
        source: CoreError,
    },

    // ── Broker ───────────────────────────────────────────────────────
    #[error("Failed to {operation}: {source}")]
    #[diagnostic(
        code(oc::broker),
        help("Check --mqtt-server and that the broker accepts your auth id and token.")
    )]
    Broker {
        operation: String,
        #[source]
        source: CoreError,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Failed to load configuration: {0}")]
    #[diagnostic(
        code(oc::config),
        help("Fix or remove the occonfig file; keys are framework-server, mqtt-server, auth-id, auth-token.")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("Failed to render output: {0}")]
    #[diagnostic(code(oc::render))]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    #[allow(clippy::unused_self)]
    pub fn exit_code(&self) -> i32 {
        exit_code::GENERAL
    }

    /// Attach the failed operation to a core error.
    pub fn from_core(operation: impl Into<String>, source: CoreError) -> Self {
        let operation = operation.into();
        match source {
            CoreError::AuthenticationFailed { .. } => Self::AuthFailed { operation, source },
            CoreError::ConnectionFailed { .. } => Self::Unreachable { operation, source },
            CoreError::NotFound { .. } => Self::NotFound { operation, source },
            CoreError::InvalidBrokerUri { .. }
            | CoreError::BrokerConnect { .. }
            | CoreError::Subscribe { .. }
            | CoreError::BrokerDisconnected { .. } => Self::Broker { operation, source },
            _ => Self::Api { operation, source },
        }
    }
}

/// `map_err` adapter: `.map_err(failed("list users"))?`.
pub fn failed(operation: &'static str) -> impl FnOnce(CoreError) -> CliError {
    move |source| CliError::from_core(operation, source)
}
