//! Liveness check for candidate document links.

use tracing::debug;

use super::error::ResolveError;
use super::http_client::{Transport, is_success_status};

/// HEADs `link` and fails with [`ResolveError::Validation`] unless it answers 2xx.
///
/// Transport errors, timeouts and non-success statuses all count as invalid.
/// Only reachability is checked: a 200 serving an HTML error page still passes.
///
/// # Errors
///
/// Returns [`ResolveError::Validation`] for an empty, unreachable or
/// non-success link.
pub async fn validate_link(transport: &dyn Transport, link: &str) -> Result<(), ResolveError> {
    if link.is_empty() {
        return Err(ResolveError::validation(link));
    }
    match transport.head(link).await {
        Ok(status) if is_success_status(status) => {
            debug!(link, status, "validated link");
            Ok(())
        }
        Ok(status) => {
            debug!(link, status, "link answered non-success");
            Err(ResolveError::validation(link))
        }
        Err(error) => {
            debug!(link, error = %error, "link unreachable");
            Err(ResolveError::validation(link))
        }
    }
}

/// Returns true when `link` passes [`validate_link`].
pub async fn is_valid_link(transport: &dyn Transport, link: &str) -> bool {
    match validate_link(transport, link).await {
        Ok(()) => true,
        Err(error) => {
            debug!(error = %error, "link rejected");
            false
        }
    }
}
