// Shared authorization policy
// One decision table with two consumers: the edge gate at request time and
// the route guards after hydration. Both must reach the same conclusion
// from the same cookie state, so neither carries policy of its own.

use crate::auth::models::{Role, UserRecord};

pub const LOGIN_ROUTE: &str = "/login";
pub const ADMIN_HOME: &str = "/admin";
pub const PROVIDER_HOME: &str = "/provider/dashboard";
pub const USER_HOME: &str = "/user/home";

/// Authorization class of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Login, register, forgot-password: meant for logged-out visitors.
    PublicAuth,
    AdminScoped,
    ProviderScoped,
    UserScoped,
    /// Everything unmatched: landing page, API surface, assets.
    Open,
}

// Segment-aware prefix match: "/admin" and "/admin/users" belong to the
// admin section, "/administrator" does not.
fn in_section(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn classify_path(path: &str) -> RouteClass {
    if in_section(path, LOGIN_ROUTE)
        || in_section(path, "/register")
        || in_section(path, "/forgot-password")
    {
        RouteClass::PublicAuth
    } else if in_section(path, "/admin") {
        RouteClass::AdminScoped
    } else if in_section(path, "/provider") {
        RouteClass::ProviderScoped
    } else if in_section(path, "/user") {
        RouteClass::UserScoped
    } else {
        RouteClass::Open
    }
}

/// Post-login home for each role.
pub fn home_route(user: &UserRecord) -> &'static str {
    match user.role {
        Role::Admin => ADMIN_HOME,
        Role::Provider { .. } => PROVIDER_HOME,
        Role::User => USER_HOME,
    }
}

/// Outcome of the authorization table. Exactly one applies per evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    ToLogin,
    ToHome(&'static str),
}

/// The authorization decision table. Unauthenticated requests to a
/// protected class go to login; a role mismatch goes to that role's home;
/// authenticated visitors to the public auth pages go home as well.
pub fn authorize(class: RouteClass, principal: Option<&UserRecord>) -> AccessDecision {
    match (class, principal) {
        (RouteClass::Open, _) => AccessDecision::Allow,
        (RouteClass::PublicAuth, None) => AccessDecision::Allow,
        (RouteClass::PublicAuth, Some(user)) => AccessDecision::ToHome(home_route(user)),
        (_, None) => AccessDecision::ToLogin,
        (RouteClass::AdminScoped, Some(user)) if user.is_admin() => AccessDecision::Allow,
        (RouteClass::ProviderScoped, Some(user)) if user.is_provider() => AccessDecision::Allow,
        (RouteClass::UserScoped, Some(user)) if matches!(user.role, Role::User) => {
            AccessDecision::Allow
        }
        (_, Some(user)) => AccessDecision::ToHome(home_route(user)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::ProviderType;
    use proptest::prelude::*;

    fn admin() -> UserRecord {
        UserRecord {
            first_name: "Ada".to_string(),
            last_name: "Admin".to_string(),
            email: "ada@pawcare.test".to_string(),
            role: Role::Admin,
        }
    }

    fn pet_owner() -> UserRecord {
        UserRecord {
            first_name: "Omar".to_string(),
            last_name: "Owner".to_string(),
            email: "omar@pawcare.test".to_string(),
            role: Role::User,
        }
    }

    fn provider(provider_type: Option<ProviderType>) -> UserRecord {
        UserRecord {
            first_name: "Pat".to_string(),
            last_name: "Provider".to_string(),
            email: "pat@pawcare.test".to_string(),
            role: Role::Provider { provider_type },
        }
    }

    #[test]
    fn test_classify_section_prefixes() {
        assert_eq!(classify_path("/admin"), RouteClass::AdminScoped);
        assert_eq!(classify_path("/admin/users"), RouteClass::AdminScoped);
        assert_eq!(classify_path("/provider/dashboard"), RouteClass::ProviderScoped);
        assert_eq!(classify_path("/user/bookings"), RouteClass::UserScoped);
        assert_eq!(classify_path("/login"), RouteClass::PublicAuth);
        assert_eq!(classify_path("/register"), RouteClass::PublicAuth);
        assert_eq!(classify_path("/forgot-password"), RouteClass::PublicAuth);
    }

    #[test]
    fn test_classify_does_not_match_partial_segments() {
        assert_eq!(classify_path("/administrator"), RouteClass::Open);
        assert_eq!(classify_path("/users"), RouteClass::Open);
        assert_eq!(classify_path("/providers"), RouteClass::Open);
        assert_eq!(classify_path("/"), RouteClass::Open);
        assert_eq!(classify_path("/api/auth/login"), RouteClass::Open);
    }

    #[test]
    fn test_unauthenticated_protected_goes_to_login() {
        assert_eq!(
            authorize(RouteClass::AdminScoped, None),
            AccessDecision::ToLogin
        );
        assert_eq!(
            authorize(RouteClass::ProviderScoped, None),
            AccessDecision::ToLogin
        );
        assert_eq!(
            authorize(RouteClass::UserScoped, None),
            AccessDecision::ToLogin
        );
    }

    #[test]
    fn test_matching_role_is_allowed() {
        assert_eq!(
            authorize(RouteClass::AdminScoped, Some(&admin())),
            AccessDecision::Allow
        );
        assert_eq!(
            authorize(RouteClass::UserScoped, Some(&pet_owner())),
            AccessDecision::Allow
        );
        assert_eq!(
            authorize(
                RouteClass::ProviderScoped,
                Some(&provider(Some(ProviderType::Shop)))
            ),
            AccessDecision::Allow
        );
        // an unverified provider still owns the provider section
        assert_eq!(
            authorize(RouteClass::ProviderScoped, Some(&provider(None))),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_role_mismatch_redirects_home() {
        assert_eq!(
            authorize(
                RouteClass::AdminScoped,
                Some(&provider(Some(ProviderType::Shop)))
            ),
            AccessDecision::ToHome(PROVIDER_HOME)
        );
        assert_eq!(
            authorize(RouteClass::UserScoped, Some(&admin())),
            AccessDecision::ToHome(ADMIN_HOME)
        );
        assert_eq!(
            authorize(RouteClass::ProviderScoped, Some(&pet_owner())),
            AccessDecision::ToHome(USER_HOME)
        );
    }

    #[test]
    fn test_authenticated_visitor_leaves_auth_pages() {
        assert_eq!(
            authorize(RouteClass::PublicAuth, Some(&admin())),
            AccessDecision::ToHome(ADMIN_HOME)
        );
        assert_eq!(
            authorize(RouteClass::PublicAuth, None),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_open_routes_never_redirect() {
        assert_eq!(authorize(RouteClass::Open, None), AccessDecision::Allow);
        assert_eq!(
            authorize(RouteClass::Open, Some(&admin())),
            AccessDecision::Allow
        );
    }

    fn any_user() -> impl Strategy<Value = UserRecord> {
        prop_oneof![
            Just(admin()),
            Just(pet_owner()),
            Just(provider(None)),
            Just(provider(Some(ProviderType::Vet))),
            Just(provider(Some(ProviderType::Shop))),
            Just(provider(Some(ProviderType::Babysitter))),
        ]
    }

    fn protected_class() -> impl Strategy<Value = RouteClass> {
        prop_oneof![
            Just(RouteClass::AdminScoped),
            Just(RouteClass::ProviderScoped),
            Just(RouteClass::UserScoped),
        ]
    }

    proptest! {
        // A protected class never admits an absent principal.
        #[test]
        fn prop_protected_fails_closed(class in protected_class()) {
            prop_assert_eq!(authorize(class, None), AccessDecision::ToLogin);
        }

        // Every authenticated decision is Allow or a redirect to that
        // user's own home, never to login.
        #[test]
        fn prop_authenticated_never_bounces_to_login(
            class in protected_class(),
            user in any_user(),
        ) {
            match authorize(class, Some(&user)) {
                AccessDecision::Allow => {}
                AccessDecision::ToHome(home) => prop_assert_eq!(home, home_route(&user)),
                AccessDecision::ToLogin => prop_assert!(false, "authenticated user sent to login"),
            }
        }

        // The gate and the guards share this table, so classification must
        // be total over arbitrary paths.
        #[test]
        fn prop_classification_is_total(path in "/[a-z/]{0,24}") {
            let _ = classify_path(&path);
        }
    }
}
