//! Live topic monitor.
//!
//! Opens one broker connection with the session credentials, subscribes to
//! one or more topic filters, and hands every received publish to a
//! [`MessageSink`] in delivery order until cancelled.
//!
//! The broker event loop runs on a background task and forwards messages
//! through an unbounded channel; [`drain`] consumes that channel on the
//! caller's task. Cancellation comes from a [`CancellationToken`] the CLI
//! trips on SIGINT/SIGTERM, after which the connection is closed with a
//! proper DISCONNECT. Any other exit (error, panic, early return) drops the
//! [`PubSubClient`], whose `Drop` requests the disconnect instead.

use std::io::Write;

use oc_api::pubsub::MessageResult;
use oc_api::{Message, PubSubClient};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::error::CoreError;

// ── Sink ─────────────────────────────────────────────────────────────

/// Destination for monitored messages.
pub trait MessageSink {
    fn deliver(&mut self, message: &Message) -> Result<(), CoreError>;
}

/// Writes each message as `<topic> <payload>` on its own line, flushing
/// after every message so output interleaves correctly with pipes.
pub struct LineSink<W> {
    out: W,
}

impl<W: Write> LineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> MessageSink for LineSink<W> {
    fn deliver(&mut self, message: &Message) -> Result<(), CoreError> {
        writeln!(self.out, "{} {}", message.topic, message.payload_text())?;
        self.out.flush()?;
        Ok(())
    }
}

// ── Drain loop ───────────────────────────────────────────────────────

/// Why [`drain`] returned without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainEnd {
    /// The cancellation token fired.
    Cancelled,
    /// The producer closed the channel without reporting an error.
    Closed,
}

/// Forward messages from `rx` into `sink` until cancelled or the channel
/// ends. A broker error in the channel is returned as-is.
pub async fn drain<S: MessageSink + ?Sized>(
    rx: &mut mpsc::UnboundedReceiver<MessageResult>,
    sink: &mut S,
    cancel: &CancellationToken,
) -> Result<DrainEnd, CoreError> {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(DrainEnd::Cancelled),
            item = rx.recv() => match item {
                Some(Ok(message)) => sink.deliver(&message)?,
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(DrainEnd::Closed),
            },
        }
    }
}

// ── Monitor ──────────────────────────────────────────────────────────

pub struct Monitor {
    client: PubSubClient,
    topics: Vec<String>,
}

impl Monitor {
    /// Connect to the session's MQTT server (QoS 2, clean session).
    pub async fn connect(config: &SessionConfig) -> Result<Self, CoreError> {
        let client = PubSubClient::connect(&config.pubsub_options()).await?;
        info!(broker = %config.mqtt_server, "connected to MQTT server");
        Ok(Self {
            client,
            topics: Vec::new(),
        })
    }

    /// Subscribe to a topic filter, wildcards allowed.
    pub async fn subscribe(&mut self, topic: &str) -> Result<(), CoreError> {
        self.client.subscribe(topic).await?;
        self.topics.push(topic.to_owned());
        Ok(())
    }

    /// Stream messages into `sink` until `cancel` fires.
    ///
    /// Returns `Ok` only on cancellation. A dropped broker connection is an
    /// error; there is no reconnection.
    pub async fn run<S: MessageSink + ?Sized>(
        mut self,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<(), CoreError> {
        let mut rx = self
            .client
            .take_messages()
            .ok_or_else(|| CoreError::BrokerDisconnected {
                reason: "message stream already taken".into(),
            })?;

        match drain(&mut rx, sink, cancel).await? {
            DrainEnd::Cancelled => {
                debug!(topics = ?self.topics, "monitor cancelled");
                self.client.disconnect().await?;
                Ok(())
            }
            DrainEnd::Closed => Err(CoreError::BrokerDisconnected {
                reason: "connection closed".into(),
            }),
        }
    }
}
