//! Device command handlers.

use tabled::Tabled;

use oc_core::{Device, Session};

use crate::cli::{DeviceArgs, DeviceCommand, GlobalOpts};
use crate::error::{CliError, failed};
use crate::output;

use super::monitor;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "OWNER")]
    owner: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "TOPIC")]
    topic: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            name: d.name.clone(),
            owner: d.owner.to_string(),
            id: d.id.clone(),
            topic: d.topic.clone(),
        }
    }
}

pub async fn handle(session: &Session, args: DeviceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DeviceCommand::Ls => {
            let devices = session.list_devices().await.map_err(failed("list devices"))?;
            let out = output::render_list(
                global.output,
                &devices,
                |d| DeviceRow::from(d),
                |d| d.id.clone(),
            )?;
            output::print_output(&out)
        }
        DeviceCommand::Monitor { id } => {
            let device = session.get_device(&id).await.map_err(failed("get device"))?;
            monitor::stream(session, vec![device.subtree_topic()]).await
        }
    }
}
