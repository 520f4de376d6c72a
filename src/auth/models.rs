// Session principal model and authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Provider sub-type recorded during provider verification.
/// `babysitter` is the historical wire name for groomers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Vet,
    Shop,
    Babysitter,
}

/// Principal role, keyed on the `role` tag of the cookie JSON document.
/// `providerType` exists only on provider accounts; a provider without one
/// is valid but feature-restricted until verification completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Provider {
        #[serde(
            rename = "providerType",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        provider_type: Option<ProviderType>,
    },
}

/// The authenticated principal, round-tripping the `user_data` cookie shape:
/// `{"Firstname": ..., "Lastname": ..., "email": ..., "role": ..., "providerType"?: ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    #[serde(rename = "Firstname")]
    pub first_name: String,
    #[serde(rename = "Lastname")]
    pub last_name: String,
    pub email: String,
    #[serde(flatten)]
    pub role: Role,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    pub fn is_provider(&self) -> bool {
        matches!(self.role, Role::Provider { .. })
    }

    /// Provider sub-type; `None` for non-providers and for providers that
    /// have not completed verification.
    pub fn provider_type(&self) -> Option<ProviderType> {
        match self.role {
            Role::Provider { provider_type } => provider_type,
            _ => None,
        }
    }
}

/// Login request DTO
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration request DTO
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[serde(rename = "Firstname")]
    #[validate(custom = "crate::validation::validate_person_name")]
    pub first_name: String,
    #[serde(rename = "Lastname")]
    #[validate(custom = "crate::validation::validate_person_name")]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom = "crate::validation::validate_password_strength")]
    pub password: String,
}

/// Profile update request DTO
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProfileUpdateRequest {
    #[serde(rename = "Firstname")]
    #[validate(custom = "crate::validation::validate_person_name")]
    pub first_name: String,
    #[serde(rename = "Lastname")]
    #[validate(custom = "crate::validation::validate_person_name")]
    pub last_name: String,
}

/// Authenticated response; the bearer token travels only in the cookie.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserRecord,
}

/// What the cookie pair currently says about the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub is_authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

impl SessionResponse {
    pub fn logged_out() -> Self {
        Self {
            is_authenticated: false,
            user: None,
        }
    }
}

/// The external backend's response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Payload the backend returns from login and register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: UserRecord,
}
