//! HTTP capability used for the single fetch attempt.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::error::{IconError, Result};

pub const DEFAULT_USER_AGENT: &str =
    concat!("iconvault/", env!("CARGO_PKG_VERSION"));

/// A well-formed HTTP response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (connect, TLS, timeout, body read).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IconTransport: Send + Sync {
    async fn get(
        &self,
        url: &Url,
    ) -> std::result::Result<HttpResponse, TransportError>;
}

#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("client", &self.client)
            .finish()
    }
}

impl ReqwestTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|err| {
                IconError::Internal(format!(
                    "Failed to create HTTP client: {err}"
                ))
            })?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IconTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &Url,
    ) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| TransportError(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError(err.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
