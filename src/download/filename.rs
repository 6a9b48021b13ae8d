//! Filename derivation and sanitization for downloaded documents.

use std::path::{Component, Path};

use url::Url;

use super::constants::{DEFAULT_FILENAME, MAX_FILENAME_BYTES};

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
pub(crate) fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Longest extension kept intact when a name is shortened.
const MAX_EXTENSION_BYTES: usize = 16;

/// Shortens `name` to at most `max_bytes`, cutting on a char boundary and
/// keeping a short extension such as `.pdf`.
pub(crate) fn truncate_filename(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_EXTENSION_BYTES => name.split_at(dot),
        _ => (name, ""),
    };
    let budget = max_bytes.saturating_sub(extension.len());
    let cut = floor_char_boundary(stem, budget);
    if cut == 0 {
        return name[..floor_char_boundary(name, max_bytes)].to_string();
    }
    format!("{}{extension}", &stem[..cut])
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    s.char_indices()
        .map(|(idx, c)| idx + c.len_utf8())
        .take_while(|end| *end <= max)
        .last()
        .unwrap_or(0)
}

/// Filename for a document link: last path segment, percent-decoded,
/// sanitized and capped at [`MAX_FILENAME_BYTES`], or [`DEFAULT_FILENAME`]
/// when the segment is empty.
pub(crate) fn filename_from_url(url: &Url) -> String {
    let Some(last) = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
    else {
        return DEFAULT_FILENAME.to_string();
    };

    let decoded = urlencoding::decode(last)
        .map_or_else(|_| last.to_string(), std::borrow::Cow::into_owned);
    if decoded.trim().is_empty() {
        return DEFAULT_FILENAME.to_string();
    }
    truncate_filename(&sanitize_filename(&decoded), MAX_FILENAME_BYTES)
}
