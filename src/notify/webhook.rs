//! Discord-style webhook notifications.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use super::NotifyError;
use crate::resolver::Resolution;
use crate::user_agent;

const WEBHOOK_TIMEOUT_SECS: u64 = 15;

/// Message body posted for `identifier`.
#[must_use]
pub fn webhook_message(identifier: &str, resolution: &Resolution) -> String {
    let status = if resolution.available {
        "available"
    } else {
        "not available"
    };
    let mut message = format!("DOI: {identifier} is {status} on SciHub.");
    if let Some(link) = resolution.link() {
        message.push_str("\nPDF Link: ");
        message.push_str(link);
    }
    message
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts availability messages to a chat webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    /// Creates a notifier posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::ClientBuild`] if reqwest cannot build a client.
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .user_agent(user_agent::default_resolver_user_agent())
            .build()
            .map_err(|e| NotifyError::client_build(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Posts the message for `identifier` once; 200 and 204 count as delivered.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Transport`] if the request fails and
    /// [`NotifyError::Status`] for any other status.
    #[instrument(skip(self, resolution), fields(available = resolution.available))]
    pub async fn send(&self, identifier: &str, resolution: &Resolution) -> Result<(), NotifyError> {
        let message = webhook_message(identifier, resolution);
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { content: &message })
            .send()
            .await
            .map_err(|e| NotifyError::transport(&self.url, e.to_string()))?;

        let status = response.status().as_u16();
        if matches!(status, 200 | 204) {
            debug!(status, "webhook delivered");
            Ok(())
        } else {
            Err(NotifyError::status(&self.url, status))
        }
    }
}
