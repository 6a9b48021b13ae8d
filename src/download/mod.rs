//! Document fetcher: streams a validated link to disk.
//!
//! # Features
//!
//! - Streaming downloads (memory-efficient for large files)
//! - Filename taken from the link's last path segment, percent-decoded and sanitized
//! - Configurable timeouts (30s connect, 5min read by default)
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use scimon_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let file_path = client
//!     .download_to_file("https://sci-hub.se/pdf/xyz123.pdf", Path::new(""))
//!     .await?;
//! println!("Downloaded: {}", file_path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod filename;

pub use client::HttpClient;
pub use constants::{DEFAULT_FILENAME, MAX_FILENAME_BYTES};
pub use error::DownloadError;

// No module-local Result alias: spell out `Result<T, DownloadError>`.
