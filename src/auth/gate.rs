// Edge authorization gate
// Request-time check running before any page handler, from the request's
// cookies alone. The client-side guards reach the same conclusion from the
// same cookie state via the shared policy table; this layer exists so a
// disallowed request never executes protected handler code at all.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use crate::auth::cookies::{expired_cookie_pair, read_principal, CookiePrincipal};
use crate::auth::policy::{authorize, classify_path, AccessDecision, LOGIN_ROUTE};
use crate::AppState;

/// Middleware applied to the whole router. Classifies the path, reads the
/// cookie principal, and applies the shared authorization table.
pub async fn edge_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let class = classify_path(&path);

    let (principal, heal) = match read_principal(&jar) {
        CookiePrincipal::Authenticated(user) => (Some(user), false),
        CookiePrincipal::Anonymous => (None, false),
        CookiePrincipal::Corrupt => {
            // Token without a readable user record: treat the caller as
            // logged out and expire the pair on the way out.
            warn!("Corrupt session cookies on {}, clearing", path);
            (None, true)
        }
    };

    let response = match authorize(class, principal.as_ref()) {
        AccessDecision::Allow => {
            debug!("Edge gate pass: {}", path);
            next.run(request).await
        }
        AccessDecision::ToLogin => {
            warn!("Unauthenticated request to {}, redirecting to login", path);
            Redirect::temporary(LOGIN_ROUTE).into_response()
        }
        AccessDecision::ToHome(home) => {
            debug!("Redirecting {} to {}", path, home);
            Redirect::temporary(home).into_response()
        }
    };

    if heal {
        let (token_cookie, user_cookie) = expired_cookie_pair(state.settings.cookie_secure);
        (
            CookieJar::new().add(token_cookie).add(user_cookie),
            response,
        )
            .into_response()
    } else {
        response
    }
}
