//! Console status lines.

use crate::resolver::Resolution;

const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

/// Color codes wrapped around the status marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleStyle {
    /// Prefix for the `+` marker.
    pub success: &'static str,
    /// Prefix for the `-` marker.
    pub failure: &'static str,
    /// Suffix resetting the color.
    pub reset: &'static str,
}

impl ConsoleStyle {
    /// Green and red ANSI markers.
    #[must_use]
    pub const fn ansi() -> Self {
        Self {
            success: ANSI_GREEN,
            failure: ANSI_RED,
            reset: ANSI_RESET,
        }
    }

    /// No escape codes.
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            success: "",
            failure: "",
            reset: "",
        }
    }
}

impl Default for ConsoleStyle {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Stream a status line belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStream {
    /// Available documents.
    Stdout,
    /// Unavailable documents.
    Stderr,
}

/// Renders the one-line status for `identifier` and the stream it goes to.
#[must_use]
pub fn status_line(
    identifier: &str,
    resolution: &Resolution,
    style: ConsoleStyle,
) -> (StatusStream, String) {
    if resolution.available {
        let mut line = format!(
            "[{}+{}] DOI: {identifier} is available on SciHub.",
            style.success, style.reset
        );
        if let Some(link) = resolution.link() {
            line.push_str(" Get it at ");
            line.push_str(link);
        }
        (StatusStream::Stdout, line)
    } else {
        (
            StatusStream::Stderr,
            format!(
                "[{}-{}] DOI: {identifier} is not available on SciHub yet.",
                style.failure, style.reset
            ),
        )
    }
}

/// Prints the status line for `identifier`: stdout when available, stderr otherwise.
pub fn print_status(identifier: &str, resolution: &Resolution, style: ConsoleStyle) {
    match status_line(identifier, resolution, style) {
        (StatusStream::Stdout, line) => println!("{line}"),
        (StatusStream::Stderr, line) => eprintln!("{line}"),
    }
}
