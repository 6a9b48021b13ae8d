//! Shared User-Agent strings for mirror, download and webhook HTTP clients.

/// Project URL for User-Agent identification (RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/scimon";

/// Default User-Agent for document downloads.
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("scimon/{version} (doi-monitor; +{PROJECT_UA_URL})")
}

/// Default User-Agent for mirror page fetches, link validation and webhooks.
#[must_use]
pub(crate) fn default_resolver_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("scimon/{version} (availability-check; +{PROJECT_UA_URL})")
}
