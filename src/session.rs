use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use time::Duration;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "authToken";

/// The only value that counts as an authenticated session.
pub const SESSION_MARKER: &str = "authenticated";

/// session_cookie
///
/// Builds the cookie handed out after a correct password: whole-site path,
/// hidden from page scripts, same-site only, `Secure` when `secure` is set.
pub fn session_cookie(secure: bool, ttl_secs: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, SESSION_MARKER))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(Duration::seconds(ttl_secs))
        .build()
}

/// has_valid_session
///
/// True when the jar carries `authToken=authenticated`. Absent, empty or any
/// other value is a plain "no".
pub fn has_valid_session(jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .is_some_and(|cookie| cookie.value() == SESSION_MARKER)
}

/// secret_matches
///
/// Compares the submitted password against the configured secret. Both sides are
/// hashed first so the comparison runs over equal-length digests in constant time.
pub fn secret_matches(submitted: &str, expected: &SecretString) -> bool {
    let submitted = Sha256::digest(submitted.as_bytes());
    let expected = Sha256::digest(expected.expose_secret().as_bytes());

    submitted
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
