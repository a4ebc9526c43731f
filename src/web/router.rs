//! Axum router configuration with middleware.
//!
//! API routes are under `/api/v1/`; `GET /` serves the embedded UI page.
//! Middleware: CORS, request tracing.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::web::handlers;
use crate::web::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/search", post(handlers::search))
        .route("/import", post(handlers::import))
        .route("/import/{id}", get(handlers::import_status))
        .route("/stats", get(handlers::stats));

    Router::new()
        .route("/", get(handlers::index))
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
