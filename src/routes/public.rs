use crate::AppState;
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints that never look at the session cookie.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer. Returns "ok" immediately.
        .route("/health", get(|| async { "ok" }))
}
