use secrecy::SecretString;
use std::env;

/// Default lifetime of a session cookie, in seconds.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60;

/// AppConfig
///
/// Holds the service configuration. Loaded once at startup and shared read-only
/// through `AppState` (pulled into handlers via `FromRef`).
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the `Secure` cookie attribute.
    pub env: Env,
    // Shared secret that unlocks protected pages. `None` when unset or empty.
    pub page_access_password: Option<SecretString>,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Max-Age of the issued session cookie.
    pub session_ttl_secs: i64,
}

/// Env
///
/// Runtime context. Production issues `Secure` cookies; local development does not,
/// so the gate keeps working over plain `http://localhost`.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Env {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        }
    }

    /// Reads `APP_ENV`, falling back to `NODE_ENV` for deployments that only set the latter.
    pub fn detect() -> Self {
        env::var("APP_ENV")
            .or_else(|_| env::var("NODE_ENV"))
            .map(|raw| Env::parse(&raw))
            .unwrap_or(Env::Local)
    }
}

impl Default for AppConfig {
    /// default
    ///
    /// Non-panicking configuration for tests: local mode, no secret configured.
    fn default() -> Self {
        Self {
            env: Env::Local,
            page_access_password: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// Unlike most services, a missing `PAGE_ACCESS_PASSWORD` does not stop startup:
    /// the public pages must keep working, and the issuer answers 500 until the
    /// secret is provided.
    pub fn load() -> Self {
        Self::load_for(Env::detect())
    }

    /// load_for
    ///
    /// Same as [`AppConfig::load`], for callers that already resolved the `Env`
    /// (the binary needs it earlier to pick the log format).
    pub fn load_for(env: Env) -> Self {

        let page_access_password = env::var("PAGE_ACCESS_PASSWORD")
            .ok()
            .filter(|secret| !secret.is_empty())
            .map(SecretString::from);

        if page_access_password.is_none() {
            tracing::warn!("PAGE_ACCESS_PASSWORD is not set; protected pages cannot be unlocked");
        }

        let session_ttl_secs = match env::var("SESSION_TTL_SECS") {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(value = %raw, "invalid SESSION_TTL_SECS, using default");
                    DEFAULT_SESSION_TTL_SECS
                }
            },
            Err(_) => DEFAULT_SESSION_TTL_SECS,
        };

        Self {
            env,
            page_access_password,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            session_ttl_secs,
        }
    }

    /// Whether issued cookies carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.env == Env::Production
    }
}
