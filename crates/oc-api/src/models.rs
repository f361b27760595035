// Framework REST API wire types
//
// Shapes returned by the framework server. Record identifiers come from
// the backend's document store and may appear as `id` or `_id`. Fields the
// CLI never renders are kept in `extra` so nothing is silently dropped.

use serde::{Deserialize, Serialize};

/// Owner reference embedded in services and devices.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnerResponse {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Pub/sub endpoint of a node (service or device).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PubSubResponse {
    #[serde(default)]
    pub protocol: Option<String>,
    /// Topic root, e.g. `openchirp/device/5a1b...`.
    #[serde(default, alias = "topic")]
    pub endpoint: String,
}

/// A group membership as reported in the caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGroupResponse {
    #[serde(default, alias = "_id")]
    pub group_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub write_access: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub userid: String,
    #[serde(default)]
    pub groups: Vec<UserGroupResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResponse {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner: OwnerResponse,
    #[serde(default)]
    pub pubsub: PubSubResponse,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceResponse {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: OwnerResponse,
    #[serde(default)]
    pub pubsub: PubSubResponse,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Request bodies ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateUserRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CreateGroupRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateServiceRequest<'a> {
    pub name: &'a str,
    pub description: &'a str,
}
