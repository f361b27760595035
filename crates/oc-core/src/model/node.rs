// ── Service and device domain types ──
//
// Both are framework "nodes": they have an owner and a pub/sub topic root
// under which all of their traffic is published.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MQTT multi-level wildcard.
const SUBTREE_WILDCARD: &str = "#";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

/// Renders as `name (email)`.
impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.email)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Owner,
    /// Topic root, without a trailing wildcard.
    pub topic: String,
}

impl Service {
    /// Topic filter matching every sub-topic of this service.
    pub fn subtree_topic(&self) -> String {
        subtree_topic(&self.topic)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    pub owner: Owner,
    /// Topic root, without a trailing wildcard.
    pub topic: String,
}

impl Device {
    /// Topic filter matching every sub-topic of this device.
    pub fn subtree_topic(&self) -> String {
        subtree_topic(&self.topic)
    }
}

/// A service's security token. Regenerating replaces the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceToken {
    pub service_id: String,
    pub token: String,
}

/// Append the multi-level wildcard to a topic root: `a/b` → `a/b/#`.
pub fn subtree_topic(root: &str) -> String {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        SUBTREE_WILDCARD.to_owned()
    } else {
        format!("{root}/{SUBTREE_WILDCARD}")
    }
}
