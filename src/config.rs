// Environment-derived gateway settings

use std::time::Duration;

use crate::auth::cookies::DEFAULT_COOKIE_MAX_AGE_SECS;
use crate::auth::session::DEFAULT_LOGOUT_GRACE;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Base URL of the marketplace REST backend.
    pub backend_base_url: String,
    /// Lifetime of the auth cookie pair.
    pub cookie_max_age_secs: i64,
    /// Grace window during which route guards suppress redirects after
    /// logout. Deliberate and tunable, not a magic number.
    pub logout_grace: Duration,
    /// Whether session cookies carry the Secure attribute.
    pub cookie_secure: bool,
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

impl Settings {
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080);
        let backend_base_url = std::env::var("BACKEND_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());
        let cookie_max_age_secs = std::env::var("COOKIE_MAX_AGE_DAYS")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .map(|days| days * 24 * 60 * 60)
            .unwrap_or(DEFAULT_COOKIE_MAX_AGE_SECS);
        let logout_grace = std::env::var("LOGOUT_GRACE_MS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LOGOUT_GRACE);
        let cookie_secure = env_bool("COOKIE_SECURE").unwrap_or(false);

        Self {
            host,
            port,
            backend_base_url,
            cookie_max_age_secs,
            logout_grace,
            cookie_secure,
        }
    }
}
