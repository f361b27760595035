// ── Service environment rendering ──
//
// A freshly generated service token is usually pasted straight into the
// service's environment file. These are the variables a service process
// reads at startup, always in this order.

use crate::config::SessionConfig;
use crate::model::ServiceToken;

/// `KEY="value"` lines for a service process, in fixed order:
/// `FRAMEWORK_SERVER`, `MQTT_SERVER`, `SERVICE_ID`, `SERVICE_TOKEN`.
pub fn service_env_lines(config: &SessionConfig, token: &ServiceToken) -> Vec<String> {
    [
        ("FRAMEWORK_SERVER", config.framework_server_str()),
        ("MQTT_SERVER", config.mqtt_server.as_str()),
        ("SERVICE_ID", token.service_id.as_str()),
        ("SERVICE_TOKEN", token.token.as_str()),
    ]
    .into_iter()
    .map(|(key, value)| format!("{key}=\"{value}\""))
    .collect()
}
