// Device endpoints

use tracing::debug;

use crate::client::HostClient;
use crate::error::Error;
use crate::models::DeviceResponse;

impl HostClient {
    /// List all devices visible to the caller.
    ///
    /// `GET /apiv1/device`
    pub async fn list_devices(&self) -> Result<Vec<DeviceResponse>, Error> {
        debug!("listing devices");
        self.get("device").await
    }

    /// Fetch a single device.
    ///
    /// `GET /apiv1/device/{id}`
    pub async fn get_device(&self, device_id: &str) -> Result<DeviceResponse, Error> {
        debug!(device_id, "fetching device");
        self.get(&format!("device/{device_id}")).await
    }
}
