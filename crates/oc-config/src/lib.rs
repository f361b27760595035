//! `occonfig` discovery and layered loading for the oc CLI.
//!
//! Settings resolve as built-in defaults < config file < explicit
//! overrides. The CLI feeds flag and environment values in as overrides
//! (clap already ranks a flag above its environment variable), then turns
//! the result into an `oc_core::SessionConfig`. Core never reads files.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use oc_core::{SessionConfig, mask_secret};

/// File names looked for in each search directory, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["occonfig", "occonfig.toml"];

pub const DEFAULT_FRAMEWORK_SERVER: &str = "http://localhost";
pub const DEFAULT_MQTT_SERVER: &str = "tcp://localhost:1883";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse config file: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// The four settings an `occonfig` file may carry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Settings {
    pub framework_server: String,
    pub mqtt_server: String,
    /// User email or service id.
    pub auth_id: String,
    /// Plaintext in the file; wrapped in a `SecretString` once loaded.
    pub auth_token: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            framework_server: DEFAULT_FRAMEWORK_SERVER.into(),
            mqtt_server: DEFAULT_MQTT_SERVER.into(),
            auth_id: String::new(),
            auth_token: String::new(),
        }
    }
}

impl Settings {
    /// Render as an `occonfig` file body, one `key = "value"` line per
    /// setting. The token is written verbatim.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Human-readable summary with the token masked.
    pub fn describe(&self, source: Option<&Path>) -> Vec<String> {
        vec![
            format!("Framework Server: {}", self.framework_server),
            format!("MQTT Server: {}", self.mqtt_server),
            format!("Auth ID: {}", self.auth_id),
            format!("Auth Token: {}", mask_secret(&self.auth_token)),
            format!(
                "Config File: {}",
                source.map_or_else(|| "none".to_owned(), |p| p.display().to_string())
            ),
        ]
    }

    /// Validate and convert into the session configuration core consumes.
    pub fn to_session_config(&self) -> Result<SessionConfig, ConfigError> {
        SessionConfig::new(
            &self.framework_server,
            self.mqtt_server.clone(),
            self.auth_id.clone(),
            SecretString::from(self.auth_token.clone()),
        )
        .map_err(|e| ConfigError::Validation {
            field: "framework-server".into(),
            reason: e.to_string(),
        })
    }
}

/// Values that beat the config file. `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mqtt_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

/// Resolved settings plus the file they were read from, if any.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub settings: Settings,
    pub source: Option<PathBuf>,
}

// ── Discovery ───────────────────────────────────────────────────────

/// Directories searched for `occonfig`, highest priority first: the
/// working directory, `/etc/oc`, `$HOME/.config/oc`, `$HOME/.oc`.
pub fn search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(4);
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs.push(PathBuf::from("/etc/oc"));
    if let Some(base) = BaseDirs::new() {
        let home = base.home_dir();
        dirs.push(home.join(".config").join("oc"));
        dirs.push(home.join(".oc"));
    }
    dirs
}

/// The first existing config file across `dirs`.
pub fn find_config_file(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

// ── Loading ─────────────────────────────────────────────────────────

/// Layer defaults, the first config file found in `dirs`, and `overrides`.
///
/// A missing file is fine; a file that exists but does not parse is an
/// error.
pub fn load(dirs: &[PathBuf], overrides: &Overrides) -> Result<Loaded, ConfigError> {
    let source = find_config_file(dirs);

    let mut figment = Figment::new().merge(Serialized::defaults(Settings::default()));
    if let Some(path) = &source {
        figment = figment.merge(Toml::file_exact(path));
    }
    figment = figment.merge(Serialized::defaults(overrides));

    let settings: Settings = figment.extract()?;
    Ok(Loaded { settings, source })
}

/// Snippet for a freshly created user: their id is set, the token still has
/// to be generated server-side.
pub fn new_user_snippet(base: &Settings, email: &str) -> Settings {
    Settings {
        framework_server: base.framework_server.clone(),
        mqtt_server: base.mqtt_server.clone(),
        auth_id: email.to_owned(),
        auth_token: "MUST_GENERATE".into(),
    }
}
