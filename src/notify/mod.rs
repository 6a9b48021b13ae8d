//! Notification sink: console status lines and webhook posts.
//!
//! Neither channel can fail a check or a sweep. Webhook problems surface as
//! [`NotifyError`] so the caller can log them.

mod console;
mod webhook;

pub use console::{ConsoleStyle, StatusStream, print_status, status_line};
pub use webhook::{WebhookNotifier, webhook_message};

use thiserror::Error;

/// Webhook delivery failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The POST did not complete.
    #[error("webhook request to {url} failed: {message}")]
    Transport {
        /// Webhook URL.
        url: String,
        /// Transport error text.
        message: String,
    },

    /// The webhook answered with something other than 200 or 204.
    #[error("webhook {url} returned HTTP {status}")]
    Status {
        /// Webhook URL.
        url: String,
        /// Returned status code.
        status: u16,
    },

    /// reqwest could not build the webhook client.
    #[error("failed to build webhook client: {message}")]
    ClientBuild {
        /// Builder error text.
        message: String,
    },
}

impl NotifyError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.into(),
        }
    }

    /// Creates an unexpected-status error.
    #[must_use]
    pub fn status(url: &str, status: u16) -> Self {
        Self::Status {
            url: url.to_string(),
            status,
        }
    }

    /// Creates a client build error.
    #[must_use]
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }
}
