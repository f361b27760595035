// ── Core error types ──
//
// User-facing errors from oc-core. Handlers never see HTTP status codes or
// raw MQTT failures; the `From<oc_api::Error>` impl translates
// transport-layer errors into domain variants.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // ── Bootstrap ────────────────────────────────────────────────────
    #[error("Invalid framework server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    // ── Framework server ─────────────────────────────────────────────
    #[error("Cannot reach framework server: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    Api { message: String, status: Option<u16> },

    #[error("Unexpected response from framework server: {message}")]
    InvalidResponse { message: String },

    // ── Broker ───────────────────────────────────────────────────────
    #[error("Invalid MQTT server '{uri}': {reason}")]
    InvalidBrokerUri { uri: String, reason: String },

    #[error("Cannot connect to MQTT server: {reason}")]
    BrokerConnect { reason: String },

    #[error("Cannot subscribe to '{topic}': {reason}")]
    Subscribe { topic: String, reason: String },

    #[error("MQTT connection lost: {reason}")]
    BrokerDisconnected { reason: String },

    // ── Output ───────────────────────────────────────────────────────
    #[error("Cannot write message: {0}")]
    Output(#[from] std::io::Error),
}

impl CoreError {
    /// HTTP status of the backend response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<oc_api::Error> for CoreError {
    fn from(err: oc_api::Error) -> Self {
        match err {
            oc_api::Error::Authentication { message } => Self::AuthenticationFailed { message },
            oc_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    Self::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    Self::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            oc_api::Error::InvalidUrl(e) => Self::InvalidServerUrl {
                url: String::new(),
                reason: e.to_string(),
            },
            oc_api::Error::NotFound { message } => Self::NotFound { message },
            oc_api::Error::Conflict { message } => Self::Conflict { message },
            oc_api::Error::Api { status, message } => Self::Api {
                message,
                status: Some(status),
            },
            oc_api::Error::Deserialization { message, .. } => Self::InvalidResponse { message },
            oc_api::Error::InvalidBrokerUri { uri, reason } => {
                Self::InvalidBrokerUri { uri, reason }
            }
            oc_api::Error::PubSubConnect(reason) => Self::BrokerConnect { reason },
            oc_api::Error::PubSubSubscribe { topic, reason } => Self::Subscribe { topic, reason },
            oc_api::Error::PubSubDisconnected(reason) => Self::BrokerDisconnected { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_passes_through() {
        let err: CoreError = oc_api::Error::Conflict {
            message: "Token already exists".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Token already exists");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn api_status_is_kept() {
        let err: CoreError = oc_api::Error::Api {
            status: 400,
            message: "Group name already taken".into(),
        }
        .into();
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Group name already taken");
    }

    #[test]
    fn broker_loss_maps_to_disconnected() {
        let err: CoreError = oc_api::Error::PubSubDisconnected("reset by peer".into()).into();
        assert!(matches!(err, CoreError::BrokerDisconnected { .. }));
    }
}
