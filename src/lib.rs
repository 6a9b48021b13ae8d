//! scimon core library
//!
//! Watches DOIs on a document mirror, resolves verified download links once
//! documents appear, and keeps the list of still-missing DOIs on disk.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`resolver`] - Availability resolution (mirror page, link extraction, validation, fallback)
//! - [`monitor`] - File-backed monitored DOI list with add and sweep
//! - [`download`] - Streaming document fetcher
//! - [`notify`] - Console status lines and webhook notifications

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod monitor;
pub mod notify;
pub mod resolver;
mod user_agent;

// Re-export commonly used types
pub use download::{DownloadError, HttpClient};
pub use monitor::{AddOutcome, MonitorError, MonitoredSet, SweepObserver, SweepReport};
pub use notify::{ConsoleStyle, NotifyError, WebhookNotifier};
pub use resolver::{
    AvailabilityResolver, DEFAULT_MAX_RETRIES, MirrorConfig, Resolution, ResolveError, Resolver,
    RetryPolicy, RetryingClient, Transport,
};
