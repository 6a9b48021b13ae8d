//! Error types for availability resolution.
//!
//! None of these abort a sweep: the resolver folds them into an unavailable
//! [`Resolution`](super::Resolution) and keeps the error only as its cause.

use thiserror::Error;

/// Errors that can occur while resolving a DOI to a document link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Network failure, timeout, or retries exhausted on a transient status.
    #[error("transport error requesting {url}: {message}")]
    Transport {
        /// The URL being requested.
        url: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// The mirror page or an embedded link could not be parsed.
    #[error("failed to parse '{input}': {reason}")]
    Parse {
        /// The value that failed to parse.
        input: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A candidate link did not answer a liveness check.
    #[error("link {url} did not pass validation")]
    Validation {
        /// The link that failed validation.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {message}")]
    ClientBuild {
        /// Builder error description.
        message: String,
    },
}

impl ResolveError {
    /// Creates a `Transport` error.
    #[must_use]
    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `Validation` error.
    #[must_use]
    pub fn validation(url: &str) -> Self {
        Self::Validation {
            url: url.to_string(),
        }
    }

    /// Creates a `ClientBuild` error.
    #[must_use]
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }

    /// Returns true for network-level failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
