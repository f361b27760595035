// ── Domain model ──
//
// Transient, per-invocation copies of backend records. Nothing here is
// cached or persisted; every identifier is assigned by the backend.

pub mod node;
pub mod user;

pub use node::{Device, Owner, Service, ServiceToken};
pub use user::{Group, GroupAccess, GroupMembership, User};
