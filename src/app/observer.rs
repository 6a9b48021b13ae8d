//! Per-identifier reporting shared by the add and sweep flows.

use std::path::PathBuf;

use async_trait::async_trait;
use scimon_core::notify::print_status;
use scimon_core::{ConsoleStyle, HttpClient, Resolution, SweepObserver, WebhookNotifier};
use tracing::warn;

/// Optional download step: client plus target directory.
#[derive(Debug, Clone)]
pub(crate) struct Fetcher {
    client: HttpClient,
    dir: PathBuf,
}

impl Fetcher {
    pub(crate) fn new(client: HttpClient, dir: PathBuf) -> Self {
        Self { client, dir }
    }

    /// Downloads `link`; failures are reported and swallowed.
    pub(crate) async fn fetch(&self, identifier: &str, link: &str) {
        match self.client.download_to_file(link, &self.dir).await {
            Ok(path) => println!("PDF downloaded successfully: {}", path.display()),
            Err(error) => {
                warn!(identifier, error = %error, "download failed");
                eprintln!("Error downloading PDF for DOI {identifier}: {error}");
            }
        }
    }
}

/// Sweep observer: status line, webhook announcement, optional download.
pub(crate) struct ConsoleObserver {
    style: ConsoleStyle,
    notifier: Option<WebhookNotifier>,
    fetcher: Option<Fetcher>,
}

impl ConsoleObserver {
    pub(crate) fn new(
        style: ConsoleStyle,
        notifier: Option<WebhookNotifier>,
        fetcher: Option<Fetcher>,
    ) -> Self {
        Self {
            style,
            notifier,
            fetcher,
        }
    }
}

#[async_trait]
impl SweepObserver for ConsoleObserver {
    async fn on_resolved(&self, identifier: &str, resolution: &Resolution) {
        print_status(identifier, resolution, self.style);
        if !resolution.available {
            return;
        }

        if let Some(notifier) = &self.notifier
            && let Err(error) = notifier.send(identifier, resolution).await
        {
            warn!(identifier, error = %error, "webhook notification failed");
            eprintln!("Error sending Discord notification: {error}");
        }

        if let (Some(fetcher), Some(link)) = (&self.fetcher, resolution.link()) {
            fetcher.fetch(identifier, link).await;
        }
    }
}
