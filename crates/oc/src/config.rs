//! Bridge from global flags to `oc_config` and on to `oc_core`.

use oc_config::{Loaded, Overrides};
use oc_core::SessionConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Flag and environment values, which clap has already ranked.
fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        framework_server: global.framework_server.clone(),
        mqtt_server: global.mqtt_server.clone(),
        auth_id: global.auth_id.clone(),
        auth_token: global.auth_token.clone(),
    }
}

/// Resolve settings from every layer. A malformed occonfig fails here,
/// before any network activity.
pub fn load(global: &GlobalOpts) -> Result<Loaded, CliError> {
    let loaded = oc_config::load(&oc_config::search_dirs(), &overrides(global))?;
    tracing::debug!(source = ?loaded.source, "configuration resolved");
    Ok(loaded)
}

/// Print the resolved settings to stderr, token masked.
pub fn echo(loaded: &Loaded) {
    for line in loaded.settings.describe(loaded.source.as_deref()) {
        eprintln!("{line}");
    }
}

pub fn session_config(loaded: &Loaded) -> Result<SessionConfig, CliError> {
    Ok(loaded.settings.to_session_config()?)
}
