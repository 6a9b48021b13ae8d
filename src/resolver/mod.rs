//! Availability resolution: DOI in, verified document link out.
//!
//! # Architecture
//!
//! - [`Transport`] - injected HTTP capability (`get` / `head`), retried by [`RetryingClient`]
//! - [`extract_pdf_link`] - pulls the embedded document link out of a mirror page
//! - [`is_valid_link`] - HEAD liveness check
//! - [`AvailabilityResolver`] - primary mirror page, sentinel check, extraction,
//!   validation, then the fallback mirror
//! - [`Resolver`] - object-safe seam used by the monitored-set sweep
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use scimon_core::resolver::{AvailabilityResolver, MirrorConfig, RetryPolicy, RetryingClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(RetryingClient::new(RetryPolicy::default())?);
//! let resolver = AvailabilityResolver::new(transport, MirrorConfig::default());
//!
//! let resolution = resolver.check("10.1000/xyz123").await;
//! if let Some(link) = resolution.link() {
//!     println!("available at {link}");
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod extract;
mod http_client;
mod mirror;
mod retry;
mod validate;

pub use error::ResolveError;
pub use extract::{extract_pdf_link, normalize_link};
pub use http_client::{RetryingClient, Transport, TransportResponse, is_success_status};
pub use mirror::{
    DEFAULT_DOI_PREFIXES, DEFAULT_FALLBACK_TEMPLATE, DEFAULT_NOT_FOUND_SENTINEL,
    DEFAULT_PRIMARY_BASE, MirrorConfig,
};
pub use retry::{
    DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_status,
    classify_transport_error,
};
pub use validate::{is_valid_link, validate_link};

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

/// Outcome of resolving one identifier.
///
/// `available == false` is a normal answer. `cause` only records why the
/// engine could not do better, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Whether a document link was found and validated.
    pub available: bool,
    /// Validated link when available.
    pub link: Option<String>,
    /// Error met on the way to an unavailable answer, if any.
    pub cause: Option<ResolveError>,
}

impl Resolution {
    /// An available document at `link`.
    #[must_use]
    pub fn available(link: impl Into<String>) -> Self {
        Self {
            available: true,
            link: Some(link.into()),
            cause: None,
        }
    }

    /// Not available, nothing went wrong.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            available: false,
            link: None,
            cause: None,
        }
    }

    /// Not available, optionally because of `cause`.
    #[must_use]
    pub fn unavailable_because(cause: Option<ResolveError>) -> Self {
        Self {
            available: false,
            link: None,
            cause,
        }
    }

    /// The validated link, if any.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }
}

/// Anything that can answer "is this DOI available yet?".
///
/// Uses `async_trait` so the sweep can hold `&dyn Resolver`.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolves `identifier`; never fails, errors fold into the result.
    async fn resolve(&self, identifier: &str) -> Resolution;
}

/// Two-mirror availability resolver.
#[derive(Clone)]
pub struct AvailabilityResolver {
    transport: Arc<dyn Transport>,
    mirror: MirrorConfig,
}

impl std::fmt::Debug for AvailabilityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityResolver")
            .field("mirror", &self.mirror)
            .finish_non_exhaustive()
    }
}

impl AvailabilityResolver {
    /// Creates a resolver over `transport` for the given mirrors.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, mirror: MirrorConfig) -> Self {
        Self { transport, mirror }
    }

    /// Resolves one identifier.
    ///
    /// 1. GET the primary mirror page; transport failure or non-2xx → unavailable.
    /// 2. Sentinel phrase in the body → unavailable, no extraction.
    /// 3. Extracted link that passes HEAD validation → available.
    /// 4. Otherwise the fallback mirror link, if it validates → available.
    ///
    /// Transport errors from step 1 and extraction errors from step 3 are
    /// kept in [`Resolution::cause`].
    #[instrument(skip(self))]
    pub async fn check(&self, identifier: &str) -> Resolution {
        let page_url = self.mirror.primary_url(identifier);
        let response = match self.transport.get(&page_url).await {
            Ok(response) => response,
            Err(error) => {
                debug!(error = %error, "primary mirror unreachable");
                return Resolution::unavailable_because(Some(error));
            }
        };

        if !response.is_success() {
            debug!(status = response.status, "primary mirror returned non-success");
            return Resolution::unavailable();
        }

        if response.body.contains(&self.mirror.not_found_sentinel) {
            debug!("mirror reports document not present");
            return Resolution::unavailable();
        }

        let primary_error = match extract_pdf_link(&response.body, &self.mirror) {
            Ok(Some(link)) => {
                if is_valid_link(self.transport.as_ref(), &link).await {
                    return Resolution::available(link);
                }
                debug!(link = %link, "embedded link failed validation");
                None
            }
            Ok(None) => None,
            Err(error) => {
                debug!(error = %error, "embedded link extraction failed");
                Some(error)
            }
        };

        let fallback = self.mirror.fallback_url(identifier);
        if is_valid_link(self.transport.as_ref(), &fallback).await {
            debug!(link = %fallback, "fallback mirror link validated");
            return Resolution::available(fallback);
        }

        Resolution::unavailable_because(primary_error)
    }
}

#[async_trait]
impl Resolver for AvailabilityResolver {
    async fn resolve(&self, identifier: &str) -> Resolution {
        self.check(identifier).await
    }
}
