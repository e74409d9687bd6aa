use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{any, post},
};

/// Session Router Module
///
/// The two endpoints the route gate talks to.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        // POST /api/authenticate
        // Exchanges the shared page password for the `authToken` cookie.
        // Every other verb answers 405 with a JSON message.
        .route(
            "/api/authenticate",
            post(handlers::authenticate).fallback(handlers::method_not_allowed),
        )
        // ANY /api/check-auth
        // Reports whether the request's cookie is a valid session. Safe to call repeatedly.
        .route("/api/check-auth", any(handlers::check_auth))
}
