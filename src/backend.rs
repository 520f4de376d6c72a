// External REST backend client
// The gateway owns no auth data; it relays credentials to the marketplace
// API and translates the {success, message, data} envelope.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::auth::models::{
    ApiEnvelope, LoginData, ProfileUpdateRequest, RegisterRequest, UserRecord,
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// success=false; the backend's message travels to the call site
    #[error("backend rejected the request: {0}")]
    Rejected(String),
    #[error("backend response envelope missing data")]
    MissingData,
}

/// Seam between the gateway and the marketplace API, so tests can run the
/// full router against a stub.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginData, BackendError>;
    async fn register(&self, request: &RegisterRequest) -> Result<LoginData, BackendError>;
    async fn update_profile(
        &self,
        token: &str,
        request: &ProfileUpdateRequest,
    ) -> Result<UserRecord, BackendError>;
}

pub struct HttpAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, BackendError> {
    if !envelope.success {
        return Err(BackendError::Rejected(
            envelope
                .message
                .unwrap_or_else(|| "request rejected".to_string()),
        ));
    }
    envelope.data.ok_or(BackendError::MissingData)
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, email: &str, password: &str) -> Result<LoginData, BackendError> {
        debug!("Forwarding login to backend for {}", email);
        let envelope = self
            .client
            .post(self.endpoint("/api/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?
            .json::<ApiEnvelope<LoginData>>()
            .await?;
        unwrap_envelope(envelope)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<LoginData, BackendError> {
        debug!("Forwarding registration to backend for {}", request.email);
        let envelope = self
            .client
            .post(self.endpoint("/api/auth/register"))
            .json(request)
            .send()
            .await?
            .json::<ApiEnvelope<LoginData>>()
            .await?;
        unwrap_envelope(envelope)
    }

    async fn update_profile(
        &self,
        token: &str,
        request: &ProfileUpdateRequest,
    ) -> Result<UserRecord, BackendError> {
        let envelope = self
            .client
            .put(self.endpoint("/api/users/profile"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?
            .json::<ApiEnvelope<UserRecord>>()
            .await?;
        unwrap_envelope(envelope)
    }
}
