// Session state holder
// The client-side belief about "who is logged in", hydrated from the cookie
// pair and mutated only through the explicit transitions below. Every exit
// path that cannot prove a valid (token, user) pair lands in the logged-out
// state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::auth::cookies::{
    decode_user_data, encode_user_data, CookieStore, AUTH_TOKEN_COOKIE,
    DEFAULT_COOKIE_MAX_AGE_SECS, USER_DATA_COOKIE,
};
use crate::auth::models::UserRecord;

/// Fallback grace window after logout during which route guards suppress
/// redirects. Tunable via `LOGOUT_GRACE_MS`; see `Settings::logout_grace`.
pub const DEFAULT_LOGOUT_GRACE: Duration = Duration::from_millis(1000);

/// Reactive view the route guards consume.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub user: Option<UserRecord>,
    /// True iff the token is present and the user record parsed.
    pub is_authenticated: bool,
    /// True only during hydration or an explicit re-check.
    pub loading: bool,
    /// True between `logout()` and the post-logout navigation landing.
    pub logging_out: bool,
}

impl SessionSnapshot {
    fn initial() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: true,
            logging_out: false,
        }
    }
}

/// Single source of truth for the current session, over an injected cookie
/// store so each consumer (and each test) owns an isolated instance.
pub struct SessionStore<C: CookieStore> {
    cookies: C,
    cookie_max_age_secs: i64,
    state: SessionSnapshot,
}

impl<C: CookieStore> SessionStore<C> {
    /// Construct and run the initial `check_auth` once, as the application
    /// does at mount. All later re-checks are caller-triggered.
    pub fn hydrate(cookies: C) -> Self {
        Self::hydrate_with_max_age(cookies, DEFAULT_COOKIE_MAX_AGE_SECS)
    }

    pub fn hydrate_with_max_age(cookies: C, cookie_max_age_secs: i64) -> Self {
        let mut store = Self {
            cookies,
            cookie_max_age_secs,
            state: SessionSnapshot::initial(),
        };
        store.check_auth(None);
        store
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.clone()
    }

    pub fn cookies(&self) -> &C {
        &self.cookies
    }

    /// Re-derive the session from cookies, or trust `direct_user` on the
    /// post-login / post-profile-update fast path. A token without a
    /// parseable user record is a corrupt session: both cookies are cleared
    /// and the caller simply sees a logged-out state, never an error.
    pub fn check_auth(&mut self, direct_user: Option<UserRecord>) {
        self.state.loading = true;

        if let Some(user) = direct_user {
            // Fast path: the caller has already written the cookie pair, so
            // no cookie re-read happens here.
            self.state.user = Some(user);
            self.state.is_authenticated = true;
            self.state.loading = false;
            return;
        }

        match self.cookies.get(AUTH_TOKEN_COOKIE) {
            None => {
                self.state.user = None;
                self.state.is_authenticated = false;
            }
            Some(_) => {
                let decoded = self
                    .cookies
                    .get(USER_DATA_COOKIE)
                    .and_then(|raw| decode_user_data(&raw));
                match decoded {
                    Some(user) => {
                        self.state.user = Some(user);
                        self.state.is_authenticated = true;
                    }
                    None => {
                        debug!("Session cookies unreadable, clearing both");
                        self.cookies.delete(AUTH_TOKEN_COOKIE);
                        self.cookies.delete(USER_DATA_COOKIE);
                        self.state.user = None;
                        self.state.is_authenticated = false;
                    }
                }
            }
        }

        self.state.loading = false;
    }

    /// Write the cookie pair and trust the supplied record in one step, so
    /// no reader can observe a half-updated pair.
    pub fn login(&mut self, token: &str, user: UserRecord) {
        self.cookies
            .set(AUTH_TOKEN_COOKIE, token, self.cookie_max_age_secs);
        self.cookies.set(
            USER_DATA_COOKIE,
            &encode_user_data(&user),
            self.cookie_max_age_secs,
        );
        self.state.logging_out = false;
        self.check_auth(Some(user));
    }

    /// Clear the session. `logging_out` flips before anything else so the
    /// route guards stop issuing redirects while the navigation to the
    /// landing page is in flight. Safe to call repeatedly; a second call
    /// mid-logout is a no-op.
    pub fn logout(&mut self) {
        if self.state.logging_out {
            return;
        }
        self.state.logging_out = true;
        self.cookies.delete(AUTH_TOKEN_COOKIE);
        self.cookies.delete(USER_DATA_COOKIE);
        self.state.user = None;
        self.state.is_authenticated = false;
    }

    /// Leave the logout grace window once the post-logout navigation has
    /// landed.
    pub fn complete_logout(&mut self) {
        self.state.logging_out = false;
    }
}

/// Timer fallback for `complete_logout`: clears `logging_out` after the
/// grace window even if no navigation-complete signal ever arrives.
pub fn spawn_logout_grace<C>(
    store: Arc<Mutex<SessionStore<C>>>,
    grace: Duration,
) -> tokio::task::JoinHandle<()>
where
    C: CookieStore + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(grace).await;
        if let Ok(mut store) = store.lock() {
            store.complete_logout();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::cookies::MemoryCookieStore;
    use crate::auth::models::{ProviderType, Role};

    fn pet_owner() -> UserRecord {
        UserRecord {
            first_name: "Omar".to_string(),
            last_name: "Owner".to_string(),
            email: "omar@pawcare.test".to_string(),
            role: Role::User,
        }
    }

    fn shop_provider() -> UserRecord {
        UserRecord {
            first_name: "Pat".to_string(),
            last_name: "Store".to_string(),
            email: "pat@pawcare.test".to_string(),
            role: Role::Provider {
                provider_type: Some(ProviderType::Shop),
            },
        }
    }

    fn cookies_with_session(user: &UserRecord) -> MemoryCookieStore {
        let mut cookies = MemoryCookieStore::new();
        cookies.set(AUTH_TOKEN_COOKIE, "tok-123", DEFAULT_COOKIE_MAX_AGE_SECS);
        cookies.set(
            USER_DATA_COOKIE,
            &encode_user_data(user),
            DEFAULT_COOKIE_MAX_AGE_SECS,
        );
        cookies
    }

    #[test]
    fn test_hydrate_without_token_is_logged_out() {
        let store = SessionStore::hydrate(MemoryCookieStore::new());
        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated);
        assert_eq!(snapshot.user, None);
        assert!(!snapshot.loading);
        assert!(!snapshot.logging_out);
    }

    #[test]
    fn test_hydrate_with_valid_pair_is_authenticated() {
        let store = SessionStore::hydrate(cookies_with_session(&pet_owner()));
        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated);
        assert_eq!(snapshot.user, Some(pet_owner()));
        assert!(!snapshot.loading);
    }

    #[test]
    fn test_malformed_user_data_clears_both_cookies() {
        let mut cookies = MemoryCookieStore::new();
        cookies.set(AUTH_TOKEN_COOKIE, "tok-123", DEFAULT_COOKIE_MAX_AGE_SECS);
        cookies.set(USER_DATA_COOKIE, "%7Bnot-json", DEFAULT_COOKIE_MAX_AGE_SECS);

        let store = SessionStore::hydrate(cookies);
        let snapshot = store.snapshot();
        assert!(!snapshot.is_authenticated);
        assert_eq!(snapshot.user, None);
        assert!(!snapshot.loading);
        assert_eq!(store.cookies().get(AUTH_TOKEN_COOKIE), None);
        assert_eq!(store.cookies().get(USER_DATA_COOKIE), None);
    }

    #[test]
    fn test_token_without_user_data_is_corrupt() {
        let mut cookies = MemoryCookieStore::new();
        cookies.set(AUTH_TOKEN_COOKIE, "tok-123", DEFAULT_COOKIE_MAX_AGE_SECS);

        let store = SessionStore::hydrate(cookies);
        assert!(!store.snapshot().is_authenticated);
        assert_eq!(store.cookies().get(AUTH_TOKEN_COOKIE), None);
    }

    #[test]
    fn test_check_auth_is_idempotent() {
        let mut store = SessionStore::hydrate(cookies_with_session(&shop_provider()));
        let first = store.snapshot();
        store.check_auth(None);
        let second = store.snapshot();
        assert_eq!(first, second);
        assert!(second.is_authenticated);
    }

    #[test]
    fn test_direct_user_fast_path_skips_cookie_read() {
        // Cookies hold a corrupt pair; the direct path must not touch them.
        let mut cookies = MemoryCookieStore::new();
        cookies.set(AUTH_TOKEN_COOKIE, "tok-123", DEFAULT_COOKIE_MAX_AGE_SECS);
        cookies.set(USER_DATA_COOKIE, "garbage", DEFAULT_COOKIE_MAX_AGE_SECS);

        let mut store = SessionStore::hydrate_with_max_age(MemoryCookieStore::new(), 60);
        store.check_auth(Some(pet_owner()));
        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated);
        assert_eq!(snapshot.user, Some(pet_owner()));
        assert!(!snapshot.loading);

        // And on a store whose cookies are corrupt: still trusted, cookies untouched.
        let mut store = SessionStore {
            cookies,
            cookie_max_age_secs: 60,
            state: SessionSnapshot::initial(),
        };
        store.check_auth(Some(pet_owner()));
        assert!(store.snapshot().is_authenticated);
        assert_eq!(
            store.cookies().get(USER_DATA_COOKIE),
            Some("garbage".to_string())
        );
    }

    #[test]
    fn test_login_writes_pair_and_authenticates() {
        let mut store = SessionStore::hydrate(MemoryCookieStore::new());
        store.login("tok-456", shop_provider());

        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated);
        assert_eq!(snapshot.user, Some(shop_provider()));
        assert_eq!(
            store.cookies().get(AUTH_TOKEN_COOKIE),
            Some("tok-456".to_string())
        );
        let raw = store.cookies().get(USER_DATA_COOKIE).unwrap();
        assert_eq!(decode_user_data(&raw), Some(shop_provider()));
    }

    #[test]
    fn test_logout_clears_cookies_and_state() {
        let mut store = SessionStore::hydrate(cookies_with_session(&pet_owner()));
        store.logout();

        let snapshot = store.snapshot();
        assert!(snapshot.logging_out);
        assert!(!snapshot.is_authenticated);
        assert_eq!(snapshot.user, None);
        assert_eq!(store.cookies().get(AUTH_TOKEN_COOKIE), None);
        assert_eq!(store.cookies().get(USER_DATA_COOKIE), None);
    }

    #[test]
    fn test_logout_from_logged_out_state_still_clears() {
        let mut store = SessionStore::hydrate(MemoryCookieStore::new());
        store.logout();
        assert_eq!(store.cookies().get(AUTH_TOKEN_COOKIE), None);
        assert!(store.snapshot().logging_out);
    }

    #[test]
    fn test_logout_is_idempotent_mid_grace() {
        let mut store = SessionStore::hydrate(cookies_with_session(&pet_owner()));
        store.logout();
        store.logout();
        assert!(store.snapshot().logging_out);
        store.complete_logout();
        assert!(!store.snapshot().logging_out);
    }

    #[test]
    fn test_login_after_logout_clears_grace_flag() {
        let mut store = SessionStore::hydrate(cookies_with_session(&pet_owner()));
        store.logout();
        store.login("tok-789", pet_owner());
        let snapshot = store.snapshot();
        assert!(snapshot.is_authenticated);
        assert!(!snapshot.logging_out);
    }

    #[tokio::test]
    async fn test_logout_grace_timer_clears_flag() {
        let store = Arc::new(Mutex::new(SessionStore::hydrate(cookies_with_session(
            &pet_owner(),
        ))));
        store.lock().unwrap().logout();
        assert!(store.lock().unwrap().snapshot().logging_out);

        spawn_logout_grace(store.clone(), Duration::from_millis(10))
            .await
            .unwrap();
        assert!(!store.lock().unwrap().snapshot().logging_out);
    }
}
