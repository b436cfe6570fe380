use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::auth;
use crate::config::AppConfig;
use crate::handlers::{food_records, health};
use crate::AppState;

/// Routes under `/api`. Everything except register and login sits behind
/// `require_auth`.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected = Router::new()
        .route("/profile", get(auth::profile))
        .route(
            "/food-records",
            get(food_records::list_food_records).post(food_records::create_food_record),
        )
        .route(
            "/food-records/:id",
            put(food_records::update_food_record).delete(food_records::delete_food_record),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::require_auth));

    public.merge(protected)
}

/// Assemble the full application: health check, API, CORS, tracing and the
/// optional static frontend.
pub fn create_app(state: AppState, config: &AppConfig) -> Router {
    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.cors_origins()))
        .with_state(state);

    // Serve static frontend files if the directory exists
    let frontend_dir = &config.frontend_dir;
    if std::path::Path::new(frontend_dir).exists() {
        tracing::info!("Serving frontend from {}", frontend_dir);
        let index_path = format!("{}/index.html", frontend_dir);
        let serve_dir = ServeDir::new(frontend_dir).not_found_service(ServeFile::new(&index_path));
        app.fallback_service(serve_dir)
    } else {
        tracing::info!(
            "Frontend directory not found at {}, serving API only",
            frontend_dir
        );
        app
    }
}

/// Build CORS layer from the configured origins.
///
/// With no origins configured, defaults to permissive CORS (for development only).
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();

    if origins.is_empty() {
        tracing::warn!(
            "CORS_ALLOWED_ORIGINS not set, using permissive CORS (not recommended for production)"
        );
        return CorsLayer::permissive();
    }

    tracing::info!("CORS configured for origins: {:?}", origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .allow_credentials(true)
}
