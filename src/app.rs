//! Application state and HTTP router construction.
//!
//! Used by `main` and by the HTTP tests to build the Axum app.

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::db::Database;
use crate::graphql::MoviesSchema;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub schema: MoviesSchema,
}

/// Build the full Axum router: probes, /graphql and layers.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .merge(api::graphql::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
