// Service endpoints
//
// Services own a security token used to authenticate the service's own
// process against the framework and the broker. The token lives at
// `service/{id}/token`: POST creates it (fails if one exists), PUT
// replaces it, DELETE removes it.

use tracing::debug;

use crate::client::HostClient;
use crate::error::Error;
use crate::models::{CreateServiceRequest, ServiceResponse};

impl HostClient {
    /// List all services, in backend order.
    ///
    /// `GET /apiv1/service`
    pub async fn list_services(&self) -> Result<Vec<ServiceResponse>, Error> {
        debug!("listing services");
        self.get("service").await
    }

    /// Fetch a single service.
    ///
    /// `GET /apiv1/service/{id}`
    pub async fn get_service(&self, service_id: &str) -> Result<ServiceResponse, Error> {
        debug!(service_id, "fetching service");
        self.get(&format!("service/{service_id}")).await
    }

    /// Create a service and return the created record.
    ///
    /// `POST /apiv1/service` with `{"name", "description"}`
    pub async fn create_service(
        &self,
        name: &str,
        description: &str,
    ) -> Result<ServiceResponse, Error> {
        debug!(name, "creating service");
        self.post("service", &CreateServiceRequest { name, description })
            .await
    }

    /// Delete a service. Deleting an unknown id is an error.
    ///
    /// `DELETE /apiv1/service/{id}`
    pub async fn delete_service(&self, service_id: &str) -> Result<(), Error> {
        debug!(service_id, "deleting service");
        self.delete(&format!("service/{service_id}")).await
    }

    // ── Token lifecycle ──────────────────────────────────────────────

    /// Generate the service's security token.
    ///
    /// `POST /apiv1/service/{id}/token`
    pub async fn generate_service_token(&self, service_id: &str) -> Result<String, Error> {
        debug!(service_id, "generating service token");
        self.post_text(&format!("service/{service_id}/token")).await
    }

    /// Replace the service's security token, invalidating the old one.
    ///
    /// `PUT /apiv1/service/{id}/token`
    pub async fn regenerate_service_token(&self, service_id: &str) -> Result<String, Error> {
        debug!(service_id, "regenerating service token");
        self.put_text(&format!("service/{service_id}/token")).await
    }

    /// Remove the service's security token.
    ///
    /// `DELETE /apiv1/service/{id}/token`
    pub async fn delete_service_token(&self, service_id: &str) -> Result<(), Error> {
        debug!(service_id, "deleting service token");
        self.delete(&format!("service/{service_id}/token")).await
    }
}
