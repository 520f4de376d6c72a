// HTTP handlers for the session endpoints
// Login and register set the cookie pair; logout expires it; session
// reports the fail-closed principal; profile rewrites user_data only.

use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};
use validator::Validate;

use crate::auth::cookies::{self, CookiePrincipal};
use crate::auth::error::AuthError;
use crate::auth::models::{
    AuthResponse, LoginRequest, ProfileUpdateRequest, RegisterRequest, SessionResponse,
};
use crate::AppState;

/// Authenticate and establish the session cookie pair
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; session cookies set", body = AuthResponse),
        (status = 400, description = "Request validation failed"),
        (status = 401, description = "Credentials rejected by the backend"),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AuthError> {
    request.validate()?;

    let data = state.service.login(&request).await?;
    let (token_cookie, user_cookie) = cookies::auth_cookie_pair(
        &data.token,
        &data.user,
        state.settings.cookie_max_age_secs,
        state.settings.cookie_secure,
    );
    let jar = jar.add(token_cookie).add(user_cookie);
    Ok((jar, Json(AuthResponse { user: data.user })))
}

/// Create an account and establish the session cookie pair
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; session cookies set", body = AuthResponse),
        (status = 400, description = "Request validation failed"),
        (status = 401, description = "Registration rejected by the backend"),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AuthError> {
    request.validate()?;

    let data = state.service.register(&request).await?;
    let (token_cookie, user_cookie) = cookies::auth_cookie_pair(
        &data.token,
        &data.user,
        state.settings.cookie_max_age_secs,
        state.settings.cookie_secure,
    );
    let jar = jar.add(token_cookie).add(user_cookie);
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse { user: data.user }),
    ))
}

/// Expire both session cookies
/// POST /api/auth/logout
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Session cookies cleared")
    ),
    tag = "auth"
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    debug!("Clearing session cookies on logout");
    let (token_cookie, user_cookie) =
        cookies::expired_cookie_pair(state.settings.cookie_secure);
    (
        jar.add(token_cookie).add(user_cookie),
        StatusCode::NO_CONTENT,
    )
}

/// Report what the cookie pair currently says about the caller
/// GET /api/auth/session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Current session state", body = SessionResponse)
    ),
    tag = "auth"
)]
pub async fn session_handler(State(state): State<AppState>, jar: CookieJar) -> Response {
    match cookies::read_principal(&jar) {
        CookiePrincipal::Authenticated(user) => Json(SessionResponse {
            is_authenticated: true,
            user: Some(user),
        })
        .into_response(),
        CookiePrincipal::Anonymous => Json(SessionResponse::logged_out()).into_response(),
        CookiePrincipal::Corrupt => {
            // Self-heal: expire the unreadable pair and answer logged out.
            warn!("Corrupt session cookies on session check, clearing");
            let (token_cookie, user_cookie) =
                cookies::expired_cookie_pair(state.settings.cookie_secure);
            (
                CookieJar::new().add(token_cookie).add(user_cookie),
                Json(SessionResponse::logged_out()),
            )
                .into_response()
        }
    }
}

/// Update identity fields and rewrite the `user_data` cookie; the token
/// cookie is untouched
/// PUT /api/auth/profile
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated; user_data cookie rewritten", body = AuthResponse),
        (status = 400, description = "Request validation failed"),
        (status = 401, description = "No session token, or the backend rejected it"),
        (status = 502, description = "Backend unavailable")
    ),
    tag = "auth"
)]
pub async fn profile_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AuthError> {
    request.validate()?;

    let token = cookies::bearer_token(&jar).ok_or(AuthError::MissingToken)?;
    let user = state.service.update_profile(&token, &request).await?;

    let user_cookie = cookies::user_data_cookie(
        &user,
        state.settings.cookie_max_age_secs,
        state.settings.cookie_secure,
    );
    Ok((jar.add(user_cookie), Json(AuthResponse { user })))
}
