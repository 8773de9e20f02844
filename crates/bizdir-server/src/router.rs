//! Router assembly for the directory HTTP API.
//!
//! [`build_router`] wires the handlers to their routes with CORS and tracing
//! middleware layers.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router.
///
/// CORS is permissive (the directory front end is served from elsewhere) and
/// the CORS layer answers every `OPTIONS` request with 200 before routing, so
/// no route registers an `OPTIONS` handler.
/// TraceLayer provides request-level logging via tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/businesses",
            get(handlers::businesses::list_businesses)
                .post(handlers::businesses::create_business)
                .put(handlers::businesses::update_business)
                .delete(handlers::businesses::delete_business)
                .fallback(handlers::businesses::method_not_allowed),
        )
        .route(
            "/status",
            get(handlers::status::get_status)
                .fallback(handlers::businesses::method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
