//! Source location utilities.

use saphyr_parser::{ScanError, Span};

/// Row/column location within the source YAML document (1-indexed).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    /// 1-indexed line number in the input stream.
    pub(crate) line: u32,
    /// 1-indexed column number in the input stream.
    pub(crate) column: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    ///
    /// Used when a precise position is not available at error creation time,
    /// e.g. for nodes built programmatically during representation.
    pub const UNKNOWN: Self = Self { line: 0, column: 0 };

    /// Create a new location record from 1-indexed coordinates.
    pub(crate) const fn new(line: usize, column: usize) -> Self {
        // 4 billion lines is larger than any YAML document we expect, and
        // this is error reporting only.
        Self {
            line: line as u32,
            column: column as u32,
        }
    }

    /// 1-indexed line number, or 0 when unknown.
    #[inline]
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    /// 1-indexed column number, or 0 when unknown.
    #[inline]
    pub fn column(&self) -> u64 {
        self.column as u64
    }

    #[inline]
    pub(crate) fn is_known(&self) -> bool {
        self.line != 0 && self.column != 0
    }
}

/// Convert a `saphyr_parser::Span` to a 1-indexed [`Location`].
///
/// Called by the composer for each raw parser event.
pub(crate) fn location_from_span(span: &Span) -> Location {
    let start = &span.start;
    Location::new(start.line(), start.col() + 1)
}

/// Extract the failure position from the scanner's own error type.
pub(crate) fn location_from_scan_error(err: &ScanError) -> Location {
    let mark = err.marker();
    Location::new(mark.line(), mark.col() + 1)
}
