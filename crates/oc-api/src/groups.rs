// Group endpoints

use tracing::debug;

use crate::client::HostClient;
use crate::error::Error;
use crate::models::{CreateGroupRequest, GroupResponse};

impl HostClient {
    /// List all groups.
    ///
    /// `GET /apiv1/group/all`
    pub async fn list_groups(&self) -> Result<Vec<GroupResponse>, Error> {
        debug!("listing groups");
        self.get("group/all").await
    }

    /// Create a group.
    ///
    /// `POST /apiv1/group` with `{"name": "..."}`
    pub async fn create_group(&self, name: &str) -> Result<(), Error> {
        debug!(name, "creating group");
        self.post_no_response("group", &CreateGroupRequest { name })
            .await
    }
}
