// User endpoints
//
// `user` is the caller's own profile; `user/all` and `user/create` are
// administrative and require an admin identity.

use tracing::debug;

use crate::client::HostClient;
use crate::error::Error;
use crate::models::{CreateUserRequest, UserResponse};

impl HostClient {
    /// Fetch the authenticated user's profile.
    ///
    /// `GET /apiv1/user`
    pub async fn user_info(&self) -> Result<UserResponse, Error> {
        debug!("fetching user info");
        self.get("user").await
    }

    /// List every user account.
    ///
    /// `GET /apiv1/user/all`
    pub async fn list_users(&self) -> Result<Vec<UserResponse>, Error> {
        debug!("listing users");
        self.get("user/all").await
    }

    /// Create a user account. Validation (duplicate email, malformed
    /// address) is left to the server.
    ///
    /// `POST /apiv1/user/create` with `{"email", "password", "name"?}`
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<(), Error> {
        debug!(email, "creating user");
        self.post_no_response(
            "user/create",
            &CreateUserRequest {
                email,
                password,
                name,
            },
        )
        .await
    }
}
