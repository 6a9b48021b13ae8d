//! Retry-bounded HTTP transport used by the resolver.
//!
//! The resolver never talks to reqwest directly. It goes through the
//! [`Transport`] trait so tests can script responses per URL, while
//! production uses [`RetryingClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, instrument, trace};

use crate::user_agent;

use super::ResolveError;
use super::retry::{RetryDecision, RetryPolicy, classify_status, classify_transport_error};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Status and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }
}

/// Returns true for a 2xx status.
#[must_use]
pub fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Minimal HTTP capability the resolver depends on.
///
/// Implementations apply their own retry policy; a returned error means the
/// request failed for good.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues a GET and reads the full body as text.
    async fn get(&self, url: &str) -> Result<TransportResponse, ResolveError>;

    /// Issues a HEAD and returns the status code.
    async fn head(&self, url: &str) -> Result<u16, ResolveError>;
}

/// reqwest-backed [`Transport`] with bounded automatic retries.
#[derive(Debug, Clone)]
pub struct RetryingClient {
    client: Client,
    policy: RetryPolicy,
}

impl RetryingClient {
    /// Builds a client with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ClientBuild`] when reqwest cannot build a client.
    pub fn new(policy: RetryPolicy) -> Result<Self, ResolveError> {
        Self::with_timeouts(policy, CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Builds a client with explicit timeouts in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::ClientBuild`] when reqwest cannot build a client.
    pub fn with_timeouts(
        policy: RetryPolicy,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, ResolveError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .user_agent(user_agent::default_resolver_user_agent())
            .gzip(true)
            .build()
            .map_err(|error| ResolveError::client_build(error.to_string()))?;
        Ok(Self { client, policy })
    }

    /// Returns the retry policy in use.
    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    async fn send_with_retry(
        &self,
        method: Method,
        url: &str,
    ) -> Result<reqwest::Response, ResolveError> {
        let mut attempt = 1;
        loop {
            trace!(%method, url, attempt, "sending request");
            let (failure, message) = match self.client.request(method.clone(), url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match classify_status(status) {
                        None => return Ok(response),
                        Some(failure) => (failure, format!("HTTP {status}")),
                    }
                }
                Err(error) => (classify_transport_error(&error), error.to_string()),
            };

            match self.policy.should_retry(failure, attempt) {
                RetryDecision::Retry {
                    delay,
                    attempt: next,
                } => {
                    debug!(url, attempt, error = %message, "request failed; retrying");
                    tokio::time::sleep(delay).await;
                    attempt = next;
                }
                RetryDecision::DoNotRetry { reason } => {
                    return Err(ResolveError::transport(url, format!("{message} ({reason})")));
                }
            }
        }
    }
}

#[async_trait]
impl Transport for RetryingClient {
    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> Result<TransportResponse, ResolveError> {
        let response = self.send_with_retry(Method::GET, url).await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| ResolveError::transport(url, error.to_string()))?;
        debug!(status, bytes = body.len(), "GET complete");
        Ok(TransportResponse { status, body })
    }

    #[instrument(skip(self))]
    async fn head(&self, url: &str) -> Result<u16, ResolveError> {
        let response = self.send_with_retry(Method::HEAD, url).await?;
        let status = response.status().as_u16();
        debug!(status, "HEAD complete");
        Ok(status)
    }
}
