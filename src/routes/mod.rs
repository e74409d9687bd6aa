//! Router Module Index
//!
//! Splits the service's routes by what they touch: plain liveness checks, and the
//! two session endpoints that issue and verify the page-access cookie.

/// Routes with no session involvement (health checks).
pub mod public;

/// The session issuer and verifier under `/api`.
pub mod session;
