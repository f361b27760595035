//! MQTT pub/sub client for streaming topic traffic.
//!
//! Connects to the framework's broker with the caller's credentials and
//! forwards every received publish through a [`tokio::sync::mpsc`] channel.
//! The broker event loop runs in a background task; the consumer drains
//! the channel at its own pace.
//!
//! A subscription the broker refuses in its SUBACK is reported on the same
//! channel as [`Error::PubSubSubscribe`].
//!
//! There is no reconnection: if the broker drops the session
//! after it was established, the stream yields a single
//! [`Error::PubSubDisconnected`] and ends.
//!
//! # Example
//!
//! ```rust,ignore
//! use oc_api::pubsub::{PubSubClient, PubSubOptions};
//!
//! let mut client = PubSubClient::connect(&PubSubOptions::new("tcp://localhost:1883")).await?;
//! client.subscribe("openchirp/device/abc/#").await?;
//! let mut rx = client.take_messages().expect("receiver already taken");
//!
//! while let Some(Ok(msg)) = rx.recv().await {
//!     println!("{} {}", msg.topic, msg.payload_text());
//! }
//!
//! client.disconnect().await?;
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Duration;

use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, SubAck, SubscribeReasonCode,
    Transport,
};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::Error;

pub use rumqttc::QoS;

// ── Tuning ───────────────────────────────────────────────────────────

/// Capacity of rumqttc's outgoing request queue.
const REQUEST_CHANNEL_CAPACITY: usize = 64;

/// How long a graceful disconnect may take before the loop is cancelled.
const DISCONNECT_GRACE: Duration = Duration::from_secs(2);

const DEFAULT_PORT: u16 = 1883;
const DEFAULT_TLS_PORT: u16 = 8883;

// ── Message ──────────────────────────────────────────────────────────

/// A single publish received from the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl Message {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// The payload decoded as UTF-8, with invalid sequences replaced.
    pub fn payload_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
}

/// Items yielded by the message channel.
pub type MessageResult = Result<Message, Error>;

// ── Broker endpoint ──────────────────────────────────────────────────

/// Parsed broker URI, e.g. `tcp://localhost:1883` or `ssl://broker:8883`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerEndpoint {
    pub host: String,
    pub port: u16,
    pub tls: bool,
}

impl BrokerEndpoint {
    /// Accepts `tcp`/`mqtt` (plain) and `ssl`/`tls`/`mqtts` (TLS) schemes.
    pub fn parse(uri: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidBrokerUri {
            uri: uri.to_owned(),
            reason: reason.to_owned(),
        };

        let url = Url::parse(uri).map_err(|e| invalid(&e.to_string()))?;

        let tls = match url.scheme() {
            "tcp" | "mqtt" => false,
            "ssl" | "tls" | "mqtts" => true,
            other => return Err(invalid(&format!("unsupported scheme '{other}'"))),
        };

        let host = url
            .host_str()
            .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?
            .to_owned();

        let port = url
            .port()
            .unwrap_or(if tls { DEFAULT_TLS_PORT } else { DEFAULT_PORT });

        Ok(Self { host, port, tls })
    }
}

// ── Options ──────────────────────────────────────────────────────────

/// Connection settings for [`PubSubClient::connect`].
#[derive(Debug, Clone)]
pub struct PubSubOptions {
    /// Broker URI, e.g. `tcp://localhost:1883`.
    pub broker: String,
    /// Username presented to the broker. Empty means anonymous.
    pub username: String,
    pub password: SecretString,
    /// Delivery guarantee requested for every subscription.
    pub qos: QoS,
    /// Start with a fresh session instead of resuming a persisted one.
    pub clean_session: bool,
    pub keep_alive: Duration,
    pub connect_timeout: Duration,
    /// Client identifier; a random one is generated when `None`.
    pub client_id: Option<String>,
}

impl PubSubOptions {
    pub fn new(broker: impl Into<String>) -> Self {
        Self {
            broker: broker.into(),
            username: String::new(),
            password: SecretString::from(String::new()),
            qos: QoS::ExactlyOnce,
            clean_session: true,
            keep_alive: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            client_id: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: SecretString) -> Self {
        self.username = username.into();
        self.password = password;
        self
    }

    fn mqtt_options(&self) -> Result<MqttOptions, Error> {
        let endpoint = BrokerEndpoint::parse(&self.broker)?;
        let client_id = self.client_id.clone().unwrap_or_else(random_client_id);

        let mut opts = MqttOptions::new(client_id, endpoint.host, endpoint.port);
        opts.set_keep_alive(self.keep_alive);
        opts.set_clean_session(self.clean_session);
        if !self.username.is_empty() {
            opts.set_credentials(self.username.clone(), self.password.expose_secret());
        }
        if endpoint.tls {
            opts.set_transport(Transport::tls_with_default_config());
        }
        Ok(opts)
    }
}

/// MQTT 3.1.1 brokers only have to accept identifiers up to 23 bytes.
fn random_client_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("oc-{}", &id[..16])
}

// ── PubSubClient ─────────────────────────────────────────────────────

/// Handle to a live broker connection.
///
/// Dropping the handle requests a disconnect and stops the background
/// event loop; [`disconnect`](Self::disconnect) does the same but waits for
/// the DISCONNECT packet to go out.
pub struct PubSubClient {
    client: AsyncClient,
    qos: QoS,
    /// Topic filters in request order, matched to packet ids by the loop.
    pending: mpsc::UnboundedSender<String>,
    messages: Option<mpsc::UnboundedReceiver<MessageResult>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PubSubClient {
    /// Connect to the broker and wait for its CONNACK.
    ///
    /// Fails if the broker is unreachable, refuses the credentials, or
    /// does not answer within `connect_timeout`.
    pub async fn connect(options: &PubSubOptions) -> Result<Self, Error> {
        let mqtt = options.mqtt_options()?;
        debug!(broker = %options.broker, client_id = %mqtt.client_id(), "connecting to broker");

        let (client, mut eventloop) = AsyncClient::new(mqtt, REQUEST_CHANNEL_CAPACITY);
        wait_for_connack(&mut eventloop, options.connect_timeout).await?;
        debug!("broker accepted connection");

        let (tx, rx) = mpsc::unbounded_channel();
        let (pending, pending_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            event_loop(eventloop, tx, pending_rx, task_cancel).await;
        });

        Ok(Self {
            client,
            qos: options.qos,
            pending,
            messages: Some(rx),
            cancel,
            task: Some(task),
        })
    }

    /// Subscribe to a topic filter (wildcards allowed).
    ///
    /// Returns once the request is queued. A refusal from the broker
    /// arrives later on the message channel.
    pub async fn subscribe(&self, topic: &str) -> Result<(), Error> {
        debug!(topic, qos = ?self.qos, "subscribing");
        // The loop is gone only if the connection already ended, which the
        // channel reports on its own.
        let _ = self.pending.send(topic.to_owned());
        self.client
            .subscribe(topic, self.qos)
            .await
            .map_err(|e| Error::PubSubSubscribe {
                topic: topic.to_owned(),
                reason: e.to_string(),
            })
    }

    /// Take the receiving end of the message channel. Returns `None` once taken.
    pub fn take_messages(&mut self) -> Option<mpsc::UnboundedReceiver<MessageResult>> {
        self.messages.take()
    }

    /// Send DISCONNECT and wait (briefly) for the event loop to wind down.
    pub async fn disconnect(mut self) -> Result<(), Error> {
        debug!("disconnecting from broker");
        let result = self
            .client
            .disconnect()
            .await
            .map_err(|e| Error::PubSubDisconnected(e.to_string()));

        if let Some(task) = self.task.take() {
            if tokio::time::timeout(DISCONNECT_GRACE, task).await.is_err() {
                warn!("broker did not acknowledge disconnect in time");
            }
        }
        self.cancel.cancel();
        result
    }
}

impl Drop for PubSubClient {
    fn drop(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        // The loop exits on its own once DISCONNECT is written; cancel
        // outright only if the request could not even be queued.
        if self.client.try_disconnect().is_err() {
            self.cancel.cancel();
        }
    }
}

// ── Background event loop ────────────────────────────────────────────

async fn wait_for_connack(eventloop: &mut EventLoop, timeout: Duration) -> Result<(), Error> {
    let handshake = async {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    trace!(?ack, "received CONNACK");
                    return Ok(());
                }
                Ok(other) => trace!(?other, "event before CONNACK"),
                Err(e) => return Err(Error::PubSubConnect(e.to_string())),
            }
        }
    };

    tokio::time::timeout(timeout, handshake)
        .await
        .map_err(|_| {
            Error::PubSubConnect(format!(
                "no answer from broker within {}s",
                timeout.as_secs()
            ))
        })?
}

/// Poll the broker until cancelled, the consumer goes away, or the
/// connection ends.
async fn event_loop(
    mut eventloop: EventLoop,
    tx: mpsc::UnboundedSender<MessageResult>,
    mut pending: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
) {
    let mut in_flight: HashMap<u16, String> = HashMap::new();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    trace!(topic = %publish.topic, bytes = publish.payload.len(), "publish received");
                    let msg = Message::new(publish.topic, publish.payload.to_vec());
                    if tx.send(Ok(msg)).is_err() {
                        break;
                    }
                }
                Ok(Event::Outgoing(Outgoing::Subscribe(pkid))) => {
                    if let Ok(topic) = pending.try_recv() {
                        in_flight.insert(pkid, topic);
                    }
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    let topic = in_flight.remove(&ack.pkid).unwrap_or_default();
                    if let Some(err) = refused_subscription(&ack, topic) {
                        warn!(error = %err, "subscription refused");
                        if tx.send(Err(err)).is_err() {
                            break;
                        }
                    }
                }
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    debug!("disconnect sent");
                    break;
                }
                Ok(other) => trace!(?other, "broker event"),
                Err(e) => {
                    warn!(error = %e, "broker connection ended");
                    let _ = tx.send(Err(Error::PubSubDisconnected(e.to_string())));
                    break;
                }
            }
        }
    }
}

/// The error for a SUBACK that carries a failure return code, if any.
fn refused_subscription(ack: &SubAck, topic: String) -> Option<Error> {
    debug!(pkid = ack.pkid, codes = ?ack.return_codes, "subscription acknowledged");
    ack.return_codes
        .iter()
        .any(|code| matches!(code, SubscribeReasonCode::Failure))
        .then(|| Error::PubSubSubscribe {
            topic,
            reason: "refused by broker".into(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_broker_uri() {
        let ep = BrokerEndpoint::parse("tcp://localhost:1883").unwrap();
        assert_eq!(
            ep,
            BrokerEndpoint {
                host: "localhost".into(),
                port: 1883,
                tls: false,
            }
        );
    }

    #[test]
    fn tls_schemes_default_to_8883() {
        let ep = BrokerEndpoint::parse("ssl://mq.example").unwrap();
        assert!(ep.tls);
        assert_eq!(ep.port, 8883);
        assert_eq!(ep.host, "mq.example");
    }

    #[test]
    fn rejects_unknown_scheme() {
        let err = BrokerEndpoint::parse("http://mq.example").unwrap_err();
        assert!(matches!(err, Error::InvalidBrokerUri { .. }));
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn rejects_missing_host() {
        assert!(BrokerEndpoint::parse("localhost:1883").is_err());
    }

    #[test]
    fn client_ids_fit_mqtt_limit() {
        let id = random_client_id();
        assert!(id.len() <= 23, "{id} is too long");
        assert!(id.starts_with("oc-"));
    }

    #[test]
    fn failed_suback_names_the_topic() {
        let ack = SubAck::new(7, vec![SubscribeReasonCode::Failure]);
        let err = refused_subscription(&ack, "openchirp/device/x/#".into()).unwrap();
        assert!(matches!(
            err,
            Error::PubSubSubscribe { ref topic, .. } if topic == "openchirp/device/x/#"
        ));
        assert!(err.to_string().contains("refused by broker"));
    }

    #[test]
    fn granted_suback_is_not_an_error() {
        let ack = SubAck::new(7, vec![SubscribeReasonCode::Success(QoS::ExactlyOnce)]);
        assert!(refused_subscription(&ack, "a/#".into()).is_none());
    }

    #[test]
    fn lossy_payload_text() {
        let msg = Message::new("a/b", vec![b'h', b'i', 0xff]);
        assert_eq!(msg.payload_text(), "hi\u{fffd}");
    }
}
