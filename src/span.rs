//! Human-readable locations for styled ranges.
//!
//! Lexers work in byte positions; these types exist for reporting, mainly
//! the CLI's pretty and JSON output.

use serde::Serialize;
use std::fmt;

/// A location in a document (line and column, 1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, counted in Unicode code points).
    pub column: u32,
}

impl Location {
    /// Create a location at the specified line and column.
    pub fn at(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A byte range with its start and end locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    /// Byte offset of the first byte (inclusive).
    pub start: usize,
    /// Byte offset past the last byte (exclusive).
    pub end: usize,
    /// Location of `start`.
    pub start_loc: Location,
    /// Location of `end`.
    pub end_loc: Location,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize, start_loc: Location, end_loc: Location) -> Self {
        Self {
            start,
            end,
            start_loc,
            end_loc,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_loc == self.end_loc {
            write!(f, "{}", self.start_loc)
        } else {
            write!(f, "{}-{}", self.start_loc, self.end_loc)
        }
    }
}

/// A maximal run of bytes sharing one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleRun {
    /// Where the run is.
    pub span: Span,
    /// Style byte of every position in the run.
    pub style: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_display() {
        let span = Span::new(0, 5, Location::at(1, 1), Location::at(1, 6));
        assert_eq!(format!("{}", span), "1:1-1:6");
        assert_eq!(span.len(), 5);

        let point = Span::new(3, 3, Location::at(2, 4), Location::at(2, 4));
        assert_eq!(format!("{}", point), "2:4");
        assert!(point.is_empty());
    }

    #[test]
    fn test_style_run_serializes() {
        let run = StyleRun {
            span: Span::new(0, 2, Location::at(1, 1), Location::at(1, 3)),
            style: 5,
        };
        let json = serde_json::to_string(&run).unwrap();
        assert!(json.contains("\"style\":5"));
        assert!(json.contains("\"start_loc\":{\"line\":1,\"column\":1}"));
    }
}
