//! Constants for the download module.

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Filename used when the link has no usable last path segment.
pub const DEFAULT_FILENAME: &str = "download.pdf";

/// Longest filename, in bytes, written for a downloaded document.
pub const MAX_FILENAME_BYTES: usize = 100;
