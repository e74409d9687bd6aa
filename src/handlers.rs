use crate::{
    config::AppConfig,
    error::ApiError,
    models::{AuthenticateRequest, AuthenticateResponse, MessageResponse, SessionStatus},
    session,
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;

// --- Handlers ---

/// authenticate
///
/// [Session Issuer] Checks the submitted password against `PAGE_ACCESS_PASSWORD`.
/// On a match the response sets the `authToken` session cookie; on a mismatch no
/// cookie is touched. An unconfigured secret is reported as a server error rather
/// than letting anyone in, whatever the body looks like. A body that is not a usable
/// `{ password: string }` (wrong content type, empty, bad JSON, non-string password)
/// is a failed match, so the client still gets the JSON 401.
#[utoipa::path(
    post,
    path = "/api/authenticate",
    request_body = AuthenticateRequest,
    responses(
        (status = 200, description = "Session cookie issued", body = AuthenticateResponse),
        (status = 401, description = "Incorrect password", body = MessageResponse),
        (status = 405, description = "Method Not Allowed", body = MessageResponse),
        (status = 500, description = "Secret not configured", body = MessageResponse)
    )
)]
pub async fn authenticate(
    State(config): State<AppConfig>,
    jar: CookieJar,
    payload: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthenticateResponse>), ApiError> {
    let Some(secret) = config.page_access_password.as_ref() else {
        tracing::error!("PAGE_ACCESS_PASSWORD environment variable is not set");
        return Err(ApiError::SecretNotConfigured);
    };

    let Json(payload) = payload.map_err(|rejection| {
        tracing::info!(reason = %rejection.body_text(), "unusable authenticate body");
        ApiError::IncorrectPassword
    })?;

    if !session::secret_matches(&payload.password, secret) {
        tracing::info!("rejected page access password");
        return Err(ApiError::IncorrectPassword);
    }

    tracing::info!(ttl_secs = config.session_ttl_secs, "issued session cookie");
    let cookie = session::session_cookie(config.secure_cookies(), config.session_ttl_secs);

    Ok((jar.add(cookie), Json(AuthenticateResponse { success: true })))
}

/// check_auth
///
/// [Session Verifier] Reports whether the request carries a valid session cookie.
/// "Not authenticated" is a normal answer (401), not an error. No side effects.
#[utoipa::path(
    get,
    path = "/api/check-auth",
    description = "Accepts any HTTP method; only the `Cookie` header is read.",
    responses(
        (status = 200, description = "Valid session", body = SessionStatus),
        (status = 401, description = "No valid session", body = SessionStatus)
    )
)]
pub async fn check_auth(jar: CookieJar) -> (StatusCode, Json<SessionStatus>) {
    let authenticated = session::has_valid_session(&jar);
    tracing::debug!(authenticated, "session check");

    let status = if authenticated {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    (status, Json(SessionStatus { authenticated }))
}

/// method_not_allowed
///
/// Fallback for every verb other than POST on the issuer route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
