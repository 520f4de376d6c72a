// PawCare gateway
// Edge authorization and session surface for the pet-care marketplace
// front end. All business data lives in the external REST backend; this
// service owns the cookie pair and the authorization policy around it.

mod auth;
mod backend;
mod config;
mod models;
mod validation;

use std::sync::Arc;

use axum::{
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::capabilities::{provider_nav_items, provider_type_label};
use auth::cookies::{read_principal, CookiePrincipal};
use auth::gate::edge_gate;
use auth::handlers::{
    login_handler, logout_handler, profile_handler, register_handler, session_handler,
};
use auth::service::AuthService;
use backend::HttpAuthBackend;
use config::Settings;
use models::{ProviderShell, SectionShell};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::login_handler,
        auth::handlers::register_handler,
        auth::handlers::logout_handler,
        auth::handlers::session_handler,
        auth::handlers::profile_handler,
    ),
    components(
        schemas(
            auth::models::LoginRequest,
            auth::models::RegisterRequest,
            auth::models::ProfileUpdateRequest,
            auth::models::AuthResponse,
            auth::models::SessionResponse,
            auth::models::UserRecord,
            auth::models::Role,
            auth::models::ProviderType,
            auth::capabilities::NavItem,
            models::SectionShell,
            models::ProviderShell,
        )
    ),
    tags(
        (name = "auth", description = "Session and authentication endpoints")
    ),
    info(
        title = "PawCare Gateway",
        version = "1.0.0",
        description = "Edge authorization and session management for the PawCare marketplace",
        contact(
            name = "API Support",
            email = "support@pawcare.app"
        )
    )
)]
struct ApiDoc;

/// Application state shared across handlers and the edge gate
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AuthService>,
    pub settings: Arc<Settings>,
}

/// Landing page shell, open to everyone
async fn landing() -> Json<SectionShell> {
    Json(SectionShell::new("landing", "PawCare"))
}

/// Shell for the public auth pages; the edge gate has already bounced
/// authenticated visitors to their role home
async fn auth_shell() -> Json<SectionShell> {
    Json(SectionShell::new("auth", "Sign In"))
}

/// Admin console shell
async fn admin_shell() -> Json<SectionShell> {
    Json(SectionShell::new("admin", "Admin Console"))
}

/// Pet-owner section shell
async fn user_shell() -> Json<SectionShell> {
    Json(SectionShell::new("user", "PawCare Home"))
}

/// Provider dashboard shell. The gate guarantees a provider principal;
/// reading it again here still fails closed to the restricted nav.
async fn provider_shell(jar: CookieJar) -> Json<ProviderShell> {
    let provider_type = match read_principal(&jar) {
        CookiePrincipal::Authenticated(user) => user.provider_type(),
        _ => None,
    };
    Json(ProviderShell {
        label: provider_type_label(provider_type),
        nav: provider_nav_items(provider_type),
    })
}

/// Creates and configures the application router
/// All routes, pages and API alike, sit behind the edge gate; the gate's
/// path classification decides which of them need a principal.
fn create_router(state: AppState) -> Router {
    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Session API
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/session", get(session_handler))
        .route("/api/auth/profile", put(profile_handler))
        // Public pages
        .route("/", get(landing))
        .route("/login", get(auth_shell))
        .route("/register", get(auth_shell))
        .route("/forgot-password", get(auth_shell))
        // Guarded section shells
        .route("/admin", get(admin_shell))
        .route("/admin/*section", get(admin_shell))
        .route("/provider/dashboard", get(provider_shell))
        .route("/provider/*section", get(provider_shell))
        .route("/user/home", get(user_shell))
        .route("/user/*section", get(user_shell))
        .layer(middleware::from_fn_with_state(state.clone(), edge_gate))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("PawCare Gateway - Starting...");

    let settings = Arc::new(Settings::from_env());
    tracing::info!("Backend API at {}", settings.backend_base_url);

    let backend = Arc::new(HttpAuthBackend::new(settings.backend_base_url.clone()));
    let service = Arc::new(AuthService::new(backend));
    let state = AppState {
        service,
        settings: settings.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("PawCare Gateway is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
