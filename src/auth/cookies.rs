// Cookie store accessor
// The auth_token / user_data pair is the only session state this system
// persists. Two independent contexts read it: the edge gate (per request)
// and client script (per mount), so neither cookie is HttpOnly.

use std::collections::HashMap;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::auth::models::UserRecord;

/// Opaque bearer credential minted by the backend.
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";
/// Percent-encoded JSON document matching the `UserRecord` shape.
pub const USER_DATA_COOKIE: &str = "user_data";

/// 30 days, the max-age both cookies are written with.
pub const DEFAULT_COOKIE_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Minimal same-document cookie surface. Values move through verbatim;
/// percent-encoding is owned by the user-record codec below, which is the
/// only reader and writer of `user_data`. Absence is `None`; no operation
/// fails.
pub trait CookieStore {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&mut self, name: &str, value: &str, max_age_secs: i64);
    fn delete(&mut self, name: &str);
}

/// In-memory store standing in for `document.cookie`. Expiry is enforced by
/// the real cookie layer, not here, so `max_age_secs` is accepted and
/// ignored. Each test constructs its own isolated instance.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieStore {
    values: HashMap<String, String>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str, _max_age_secs: i64) {
        self.values.insert(name.to_string(), value.to_string());
    }

    fn delete(&mut self, name: &str) {
        self.values.remove(name);
    }
}

/// Serialize a user record into the `user_data` cookie value: JSON, then
/// percent-encoded the way `encodeURIComponent` writes it.
pub fn encode_user_data(user: &UserRecord) -> String {
    let json = serde_json::to_string(user).unwrap_or_default();
    urlencoding::encode(&json).into_owned()
}

/// Decode the `user_data` cookie value. Bad percent-encoding and malformed
/// JSON are both `None`; corrupt input never propagates an error.
pub fn decode_user_data(raw: &str) -> Option<UserRecord> {
    let json = urlencoding::decode(raw).ok()?;
    serde_json::from_str(&json).ok()
}

fn session_cookie(
    name: &'static str,
    value: String,
    max_age: Duration,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(max_age)
        .build()
}

/// The `user_data` cookie alone, for the post-profile-update fast path
/// where the token cookie stays untouched.
pub fn user_data_cookie(user: &UserRecord, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    session_cookie(
        USER_DATA_COOKIE,
        encode_user_data(user),
        Duration::seconds(max_age_secs),
        secure,
    )
}

/// Both session cookies, written together on login and register.
pub fn auth_cookie_pair(
    token: &str,
    user: &UserRecord,
    max_age_secs: i64,
    secure: bool,
) -> (Cookie<'static>, Cookie<'static>) {
    (
        session_cookie(
            AUTH_TOKEN_COOKIE,
            token.to_owned(),
            Duration::seconds(max_age_secs),
            secure,
        ),
        user_data_cookie(user, max_age_secs, secure),
    )
}

/// Expired pair used to clear the session on logout and when healing a
/// corrupt cookie state.
pub fn expired_cookie_pair(secure: bool) -> (Cookie<'static>, Cookie<'static>) {
    (
        session_cookie(AUTH_TOKEN_COOKIE, String::new(), Duration::ZERO, secure),
        session_cookie(USER_DATA_COOKIE, String::new(), Duration::ZERO, secure),
    )
}

/// What a request's cookie pair says about the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum CookiePrincipal {
    Anonymous,
    Authenticated(UserRecord),
    /// Token present but the user record is missing or unreadable.
    Corrupt,
}

/// The bearer token, if one is present and non-empty.
pub fn bearer_token(jar: &CookieJar) -> Option<String> {
    jar.get(AUTH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

/// Read the principal from a request jar. A token without a parseable user
/// record is `Corrupt`, never `Authenticated`: the pair is only trusted
/// whole.
pub fn read_principal(jar: &CookieJar) -> CookiePrincipal {
    if bearer_token(jar).is_none() {
        return CookiePrincipal::Anonymous;
    }
    match jar
        .get(USER_DATA_COOKIE)
        .and_then(|cookie| decode_user_data(cookie.value()))
    {
        Some(user) => CookiePrincipal::Authenticated(user),
        None => CookiePrincipal::Corrupt,
    }
}
