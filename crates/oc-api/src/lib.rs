// oc-api: Async Rust client for the OpenChirp framework REST API and MQTT broker

pub mod client;
pub mod devices;
pub mod error;
pub mod groups;
pub mod models;
pub mod pubsub;
pub mod services;
pub mod transport;
pub mod users;

pub use client::HostClient;
pub use error::Error;
pub use pubsub::{Message, PubSubClient, PubSubOptions};
pub use transport::TransportConfig;
