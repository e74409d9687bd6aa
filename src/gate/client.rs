use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::sync::Arc;

use crate::{error::GateError, models::AuthenticateRequest};

/// SessionClient
///
/// The gate's view of the two session endpoints. Swapped for a scripted
/// implementation in tests.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Asks the verifier whether the current cookie is a valid session.
    /// `Ok(false)` is a normal "signed out" answer.
    async fn verify(&self) -> Result<bool, GateError>;

    /// Submits the password to the issuer. On success the session cookie is stored
    /// by whatever carries the client's cookies.
    async fn authenticate(&self, password: &str) -> Result<(), GateError>;
}

#[async_trait]
impl<T: SessionClient + ?Sized> SessionClient for Arc<T> {
    async fn verify(&self) -> Result<bool, GateError> {
        (**self).verify().await
    }

    async fn authenticate(&self, password: &str) -> Result<(), GateError> {
        (**self).authenticate(password).await
    }
}

/// HttpSessionClient
///
/// Talks to `/api/check-auth` and `/api/authenticate` over HTTP. Keeps its own cookie
/// store, so a successful `authenticate` makes later `verify` calls succeed, the
/// same way a browser would.
#[derive(Clone, Debug)]
pub struct HttpSessionClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpSessionClient {
    /// new
    ///
    /// `base_url` is the site origin, e.g. `https://example.com`.
    pub fn new(base_url: &str) -> Result<Self, GateError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GateError::Unavailable(format!("invalid base url: {e}")))?;
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| GateError::Unavailable(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GateError> {
        self.base_url
            .join(path)
            .map_err(|e| GateError::Unavailable(format!("invalid endpoint {path}: {e}")))
    }
}

fn transport_error(err: reqwest::Error) -> GateError {
    if err.is_timeout() {
        GateError::Timeout
    } else {
        GateError::Unavailable(err.to_string())
    }
}

#[async_trait]
impl SessionClient for HttpSessionClient {
    async fn verify(&self) -> Result<bool, GateError> {
        let response = self
            .http
            .get(self.endpoint("/api/check-auth")?)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::UNAUTHORIZED => Ok(false),
            other => Err(GateError::Server(other.as_u16())),
        }
    }

    async fn authenticate(&self, password: &str) -> Result<(), GateError> {
        let body = AuthenticateRequest {
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.endpoint("/api/authenticate")?)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::UNAUTHORIZED => Err(GateError::IncorrectPassword),
            other => Err(GateError::Server(other.as_u16())),
        }
    }
}
