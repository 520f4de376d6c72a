// Authentication service - coordination between the HTTP surface and the
// external marketplace backend. The gateway owns no credentials; it relays
// them and records the resulting session state in cookies.

use std::sync::Arc;

use tracing::info;

use crate::auth::error::AuthError;
use crate::auth::models::{
    LoginData, LoginRequest, ProfileUpdateRequest, RegisterRequest, UserRecord,
};
use crate::backend::AuthBackend;

pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    /// Authenticate against the backend. The caller writes the cookie pair.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginData, AuthError> {
        let data = self.backend.login(&request.email, &request.password).await?;
        info!("Login succeeded for {}", data.user.email);
        Ok(data)
    }

    /// Create an account; the backend answers with the same token + user
    /// payload as login, so a fresh registration is immediately signed in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginData, AuthError> {
        let data = self.backend.register(request).await?;
        info!("Registration succeeded for {}", data.user.email);
        Ok(data)
    }

    /// Update identity fields; returns the refreshed record the caller must
    /// rewrite into the `user_data` cookie.
    pub async fn update_profile(
        &self,
        token: &str,
        request: &ProfileUpdateRequest,
    ) -> Result<UserRecord, AuthError> {
        let user = self.backend.update_profile(token, request).await?;
        info!("Profile updated for {}", user.email);
        Ok(user)
    }
}
