//! Live topic monitor handler, shared by `monitor`, `service monitor` and
//! `device monitor`.

use std::io;

use tokio_util::sync::CancellationToken;

use oc_core::{LineSink, Monitor, Session};

use crate::error::{CliError, failed};

use super::util;

/// Subscribe to `topics` and print `<topic> <payload>` lines until
/// SIGINT/SIGTERM. A lost broker connection is an error.
pub async fn stream(session: &Session, topics: Vec<String>) -> Result<(), CliError> {
    let cancel = CancellationToken::new();
    util::cancel_on_shutdown(cancel.clone());

    let mut monitor = Monitor::connect(session.config())
        .await
        .map_err(failed("connect to MQTT server"))?;

    for topic in &topics {
        eprintln!("Subscribing to {topic}");
        monitor.subscribe(topic).await.map_err(failed("subscribe"))?;
    }

    let mut sink = LineSink::new(io::stdout());
    monitor
        .run(&mut sink, &cancel)
        .await
        .map_err(failed("monitor topics"))
}
