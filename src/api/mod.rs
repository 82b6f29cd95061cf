// API-layer components and router assembly
use crate::handlers::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod handlers {
    pub use crate::handlers::*;
}

/// Request size limit for scoring routes (64KB).
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// Scoring and history routes, without state.
///
/// Returned bare so the binary can add rate limiting before merging.
pub fn scoring_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/history", get(handlers::history))
}

/// Adds `/health`, the body limit, tracing and CORS around `scoring`.
///
/// `/health` is merged outside `scoring` so it bypasses any layers the caller
/// put on the scoring routes.
pub fn with_common_layers(scoring: Router<Arc<AppState>>, state: Arc<AppState>) -> Router {
    let scoring = scoring.layer(
        ServiceBuilder::new()
            // Request size limit: application bodies are a few hundred bytes
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES)),
    );

    Router::new()
        .route("/health", get(handlers::health))
        .merge(scoring)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Browser frontends call the API cross-origin
                .layer(CorsLayer::permissive()),
        )
}

/// Full router without rate limiting.
pub fn router(state: Arc<AppState>) -> Router {
    with_common_layers(scoring_routes(), state)
}
