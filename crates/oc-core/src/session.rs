// ── Session ──
//
// One authenticated handle per invocation. Building it validates the
// configuration but performs no network call: credentials ride along on
// every request, so rejected credentials surface on the first operation.

use oc_api::{HostClient, TransportConfig};
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::CoreError;
use crate::model::{Device, Group, Service, ServiceToken, User};

pub struct Session {
    config: SessionConfig,
    client: HostClient,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, CoreError> {
        Self::with_transport(config, &TransportConfig::default())
    }

    pub fn with_transport(
        config: SessionConfig,
        transport: &TransportConfig,
    ) -> Result<Self, CoreError> {
        let client = HostClient::new(
            config.framework_server.as_str(),
            &config.auth_id,
            &config.auth_token,
            transport,
        )
        .map_err(|e| CoreError::InvalidServerUrl {
            url: config.framework_server_str().to_owned(),
            reason: e.to_string(),
        })?;
        debug!(base_url = %client.base_url(), auth_id = %config.auth_id, "session ready");
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ── Users ────────────────────────────────────────────────────────

    /// Profile of the authenticated user.
    pub async fn user_info(&self) -> Result<User, CoreError> {
        Ok(self.client.user_info().await?.into())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, CoreError> {
        let users = self.client.list_users().await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<(), CoreError> {
        Ok(self.client.create_user(email, password, name).await?)
    }

    // ── Groups ───────────────────────────────────────────────────────

    pub async fn list_groups(&self) -> Result<Vec<Group>, CoreError> {
        let groups = self.client.list_groups().await?;
        Ok(groups.into_iter().map(Group::from).collect())
    }

    pub async fn create_group(&self, name: &str) -> Result<(), CoreError> {
        Ok(self.client.create_group(name).await?)
    }

    // ── Services ─────────────────────────────────────────────────────

    pub async fn list_services(&self) -> Result<Vec<Service>, CoreError> {
        let services = self.client.list_services().await?;
        Ok(services.into_iter().map(Service::from).collect())
    }

    pub async fn get_service(&self, service_id: &str) -> Result<Service, CoreError> {
        Ok(self.client.get_service(service_id).await?.into())
    }

    /// Create a service and return its backend-assigned id.
    pub async fn create_service(&self, name: &str, description: &str) -> Result<String, CoreError> {
        let created = self.client.create_service(name, description).await?;
        if created.id.is_empty() {
            return Err(CoreError::InvalidResponse {
                message: "created service has no id".into(),
            });
        }
        Ok(created.id)
    }

    pub async fn delete_service(&self, service_id: &str) -> Result<(), CoreError> {
        Ok(self.client.delete_service(service_id).await?)
    }

    /// Create the service's token. Fails if the service already has one.
    pub async fn generate_token(&self, service_id: &str) -> Result<ServiceToken, CoreError> {
        let token = self.client.generate_service_token(service_id).await?;
        Ok(ServiceToken {
            service_id: service_id.to_owned(),
            token,
        })
    }

    /// Replace the service's token; the previous value stops working.
    pub async fn regenerate_token(&self, service_id: &str) -> Result<ServiceToken, CoreError> {
        let token = self.client.regenerate_service_token(service_id).await?;
        Ok(ServiceToken {
            service_id: service_id.to_owned(),
            token,
        })
    }

    pub async fn delete_token(&self, service_id: &str) -> Result<(), CoreError> {
        Ok(self.client.delete_service_token(service_id).await?)
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices(&self) -> Result<Vec<Device>, CoreError> {
        let devices = self.client.list_devices().await?;
        Ok(devices.into_iter().map(Device::from).collect())
    }

    pub async fn get_device(&self, device_id: &str) -> Result<Device, CoreError> {
        Ok(self.client.get_device(device_id).await?.into())
    }
}
