//! Mirror endpoints and page markers used by the resolver.
//!
//! Everything the resolver would otherwise hard-code lives here so tests can
//! point it at a mock server with a fake sentinel.

use url::Url;

use super::ResolveError;

/// Base URL of the primary mirror; the DOI is appended verbatim.
pub const DEFAULT_PRIMARY_BASE: &str = "https://sci-hub.se/";

/// Path template of the fallback mirror; `{doi}` is replaced by the bare DOI.
pub const DEFAULT_FALLBACK_TEMPLATE: &str = "https://sci.bban.top/pdf/{doi}.pdf";

/// Phrase the primary mirror renders when it has no document for a DOI.
pub const DEFAULT_NOT_FOUND_SENTINEL: &str =
    "Unfortunately, Sci-Hub doesn't have the requested document";

/// Placeholder substituted in [`MirrorConfig::fallback_template`].
pub const DOI_PLACEHOLDER: &str = "{doi}";

/// Resolver URL prefixes stripped before building the fallback link.
pub const DEFAULT_DOI_PREFIXES: [&str; 4] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
];

/// Endpoints and markers for the two mirrors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Primary mirror base; must end with `/`.
    pub primary_base: String,
    /// Fallback PDF URL template containing `{doi}`.
    pub fallback_template: String,
    /// Body substring meaning "document not present".
    pub not_found_sentinel: String,
    /// Prefixes removed from an identifier to obtain the bare DOI.
    pub doi_prefixes: Vec<String>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            primary_base: DEFAULT_PRIMARY_BASE.to_string(),
            fallback_template: DEFAULT_FALLBACK_TEMPLATE.to_string(),
            not_found_sentinel: DEFAULT_NOT_FOUND_SENTINEL.to_string(),
            doi_prefixes: DEFAULT_DOI_PREFIXES.iter().map(|p| (*p).to_string()).collect(),
        }
    }
}

impl MirrorConfig {
    /// Creates a config for the given mirrors with the default sentinel and prefixes.
    ///
    /// A missing trailing `/` on `primary_base` is added.
    #[must_use]
    pub fn new(primary_base: impl Into<String>, fallback_template: impl Into<String>) -> Self {
        let mut primary_base = primary_base.into();
        if !primary_base.ends_with('/') {
            primary_base.push('/');
        }
        Self {
            primary_base,
            fallback_template: fallback_template.into(),
            ..Self::default()
        }
    }

    /// Replaces the not-found sentinel.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.not_found_sentinel = sentinel.into();
        self
    }

    /// URL of the primary mirror page for `identifier`.
    #[must_use]
    pub fn primary_url(&self, identifier: &str) -> String {
        format!("{}{}", self.primary_base, identifier)
    }

    /// Strips the first matching resolver prefix from `identifier`.
    #[must_use]
    pub fn bare_doi<'a>(&self, identifier: &'a str) -> &'a str {
        self.doi_prefixes
            .iter()
            .find_map(|prefix| identifier.strip_prefix(prefix.as_str()))
            .unwrap_or(identifier)
    }

    /// Fallback PDF link for `identifier`.
    #[must_use]
    pub fn fallback_url(&self, identifier: &str) -> String {
        self.fallback_template
            .replace(DOI_PLACEHOLDER, self.bare_doi(identifier))
    }

    /// Origin (scheme, host, port) of the primary mirror.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Parse`] when `primary_base` is not an absolute URL.
    pub fn primary_origin(&self) -> Result<Url, ResolveError> {
        let url = Url::parse(&self.primary_base)
            .map_err(|error| ResolveError::parse(&self.primary_base, error.to_string()))?;
        if url.host_str().is_none() {
            return Err(ResolveError::parse(&self.primary_base, "mirror base has no host"));
        }
        Ok(url)
    }
}
