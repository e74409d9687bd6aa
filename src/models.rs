use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Request Payloads ---

/// AuthenticateRequest
///
/// Body of `POST /api/authenticate`. A missing `password` field is treated as an
/// empty submission, which never matches a configured secret.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct AuthenticateRequest {
    #[serde(default)]
    pub password: String,
}

// --- Responses ---

/// AuthenticateResponse
///
/// Returned with the session cookie on a correct password.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct AuthenticateResponse {
    pub success: bool,
}

/// SessionStatus
///
/// Answer of the session verifier. Sent with 200 when true, 401 when false.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct SessionStatus {
    pub authenticated: bool,
}

/// MessageResponse
///
/// Body of every failure outcome of the issuer (401, 405, 500).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}
