use thiserror::Error;

/// Top-level error type for the `oc-api` crate.
///
/// Covers both API surfaces: the framework REST server and the MQTT
/// broker. `oc-core` maps these into domain-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Credentials rejected by the framework server (HTTP 401/403).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Framework API ───────────────────────────────────────────────
    /// The requested resource does not exist (HTTP 404).
    #[error("{message}")]
    NotFound { message: String },

    /// The request conflicts with existing state (HTTP 409).
    #[error("{message}")]
    Conflict { message: String },

    /// Any other non-success response, with the backend's message.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Pub/Sub ─────────────────────────────────────────────────────
    /// The broker URI could not be understood.
    #[error("Invalid broker URI '{uri}': {reason}")]
    InvalidBrokerUri { uri: String, reason: String },

    /// Connecting to the broker failed or the broker refused the session.
    #[error("MQTT connection failed: {0}")]
    PubSubConnect(String),

    /// A subscribe request could not be queued or the broker refused it.
    #[error("MQTT subscribe to '{topic}' failed: {reason}")]
    PubSubSubscribe { topic: String, reason: String },

    /// The broker connection dropped after it was established.
    #[error("MQTT connection lost: {0}")]
    PubSubDisconnected(String),
}

impl Error {
    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status of a failed framework request, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
