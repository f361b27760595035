// ── Runtime session configuration ──
//
// Describes where the framework server and broker live and who to log in
// as. Built once per invocation by the CLI and passed by reference; core
// never reads config files or the environment.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use oc_api::PubSubOptions;

use crate::error::CoreError;

#[derive(Clone)]
pub struct SessionConfig {
    /// Framework REST server, e.g. `http://localhost`.
    pub framework_server: Url,
    /// MQTT broker URI, e.g. `tcp://localhost:1883`.
    pub mqtt_server: String,
    /// User email or service id.
    pub auth_id: String,
    pub auth_token: SecretString,
}

impl SessionConfig {
    /// Validate the framework server URL and assemble a config.
    pub fn new(
        framework_server: &str,
        mqtt_server: impl Into<String>,
        auth_id: impl Into<String>,
        auth_token: SecretString,
    ) -> Result<Self, CoreError> {
        let framework_server =
            Url::parse(framework_server).map_err(|e| CoreError::InvalidServerUrl {
                url: framework_server.to_owned(),
                reason: e.to_string(),
            })?;
        if framework_server.cannot_be_a_base() {
            return Err(CoreError::InvalidServerUrl {
                url: framework_server.to_string(),
                reason: "not an http(s) URL".into(),
            });
        }

        Ok(Self {
            framework_server,
            mqtt_server: mqtt_server.into(),
            auth_id: auth_id.into(),
            auth_token,
        })
    }

    /// The framework server exactly as configured, without the trailing
    /// slash `Url` adds to bare hosts.
    pub fn framework_server_str(&self) -> &str {
        let s = self.framework_server.as_str();
        if self.framework_server.path() == "/" {
            s.trim_end_matches('/')
        } else {
            s
        }
    }

    /// Broker connection settings using the session credentials.
    pub fn pubsub_options(&self) -> PubSubOptions {
        PubSubOptions::new(self.mqtt_server.clone())
            .with_credentials(self.auth_id.clone(), self.auth_token.clone())
    }

    /// The auth token with all but its last four characters hidden.
    pub fn masked_token(&self) -> String {
        mask_secret(self.auth_token.expose_secret())
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("framework_server", &self.framework_server_str())
            .field("mqtt_server", &self.mqtt_server)
            .field("auth_id", &self.auth_id)
            .field("auth_token", &self.masked_token())
            .finish()
    }
}

/// Mask a secret for display. Short or empty secrets are hidden entirely.
pub fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len == 0 {
        return String::new();
    }
    if len <= 8 {
        return "*".repeat(len);
    }
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("{}{tail}", "*".repeat(len - 4))
}
