//! Embedded PDF link extraction from primary mirror pages.
//!
//! The mirror renders the document inside an `<embed src="...">` element. The
//! `src` value is frequently relative, protocol-relative, or carries viewer
//! parameters after `#`, so it is normalized against the mirror origin before
//! use.

use scraper::{Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use super::ResolveError;
use super::mirror::MirrorConfig;

const EMBED_SELECTOR: &str = "embed[src]";

/// Extracts the first embedded document link from a mirror page.
///
/// Returns `Ok(None)` when the page has no `embed[src]` element; absence of a
/// link is not a failure.
///
/// # Errors
///
/// Returns [`ResolveError::Parse`] when the `src` value is not a usable URL,
/// including malformed percent-encoding.
#[instrument(skip(html, mirror), fields(html_len = html.len()))]
pub fn extract_pdf_link(html: &str, mirror: &MirrorConfig) -> Result<Option<String>, ResolveError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(EMBED_SELECTOR)
        .map_err(|error| ResolveError::parse(EMBED_SELECTOR, error.to_string()))?;

    let Some(raw) = document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("src"))
    else {
        debug!("no embedded link on mirror page");
        return Ok(None);
    };

    let origin = mirror.primary_origin()?;
    let link = normalize_link(raw, &origin)?;
    debug!(raw, link = %link, "extracted embedded link");
    Ok(Some(link))
}

/// Normalizes a raw `src` value into an absolute link on the mirror.
///
/// The fragment is dropped, the scheme is forced to the origin's scheme, and a
/// missing or foreign host is replaced by the origin host (and port).
///
/// # Errors
///
/// Returns [`ResolveError::Parse`] for malformed percent-encoding or values
/// that cannot be expressed as a hierarchical URL.
pub fn normalize_link(raw: &str, origin: &Url) -> Result<String, ResolveError> {
    let truncated = raw.split('#').next().unwrap_or_default();
    check_percent_encoding(truncated)?;

    let mut url = Url::options()
        .base_url(Some(origin))
        .parse(truncated)
        .map_err(|error| ResolveError::parse(truncated, error.to_string()))?;

    url.set_scheme(origin.scheme())
        .map_err(|()| ResolveError::parse(truncated, "cannot force link scheme"))?;

    let origin_host = origin.host_str().unwrap_or_default();
    let on_mirror = url
        .host_str()
        .is_some_and(|host| !origin_host.is_empty() && host.contains(origin_host));
    if !on_mirror {
        url.set_host(Some(origin_host))
            .map_err(|error| ResolveError::parse(truncated, error.to_string()))?;
        url.set_port(origin.port())
            .map_err(|()| ResolveError::parse(truncated, "cannot set mirror port"))?;
    }

    Ok(url.to_string())
}

fn check_percent_encoding(value: &str) -> Result<(), ResolveError> {
    let bytes = value.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            let well_formed = bytes.get(index + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(index + 2).is_some_and(u8::is_ascii_hexdigit);
            if !well_formed {
                return Err(ResolveError::parse(
                    value,
                    format!("invalid percent-encoding at byte {index}"),
                ));
            }
            index += 3;
        } else {
            index += 1;
        }
    }
    Ok(())
}
