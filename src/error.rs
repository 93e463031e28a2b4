//! Error types.
//!
//! The lexing core never hands an error back to the host from `lex` or
//! `fold`: failures are recorded on the document as a [`Status`]. Host-side
//! operations that can legitimately fail (looking up a language, applying an
//! edit, reading input in the CLI) use [`LexerError`].

use std::fmt;

/// Error status a lexer records on its document.
///
/// The numeric values match the status codes editors already understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Status {
    /// No failure recorded.
    #[default]
    Ok,
    /// A lex or fold pass failed and was abandoned.
    Failure,
    /// Memory could not be allocated.
    BadAlloc,
}

impl Status {
    /// Numeric status code.
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Failure => 1,
            Status::BadAlloc => 2,
        }
    }

    /// Whether this status reports a failure.
    pub fn is_failure(self) -> bool {
        self != Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "ok"),
            Status::Failure => write!(f, "failure"),
            Status::BadAlloc => write!(f, "allocation failure"),
        }
    }
}

/// Errors from host-facing operations.
#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    /// No lexer is registered under this name.
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),

    /// No lexer is registered under this identifier.
    #[error("unknown language identifier {0}")]
    UnknownLanguageId(i32),

    /// An edit does not fit the current document.
    #[error("invalid edit {start}..{end} for document of length {len}")]
    InvalidEdit {
        /// Start of the replaced range.
        start: usize,
        /// End of the replaced range.
        end: usize,
        /// Length of the document the edit was applied to.
        len: usize,
    },

    /// A lexer panicked; the panic was contained at the lexer boundary.
    #[error("lexer panicked: {0}")]
    Panicked(String),

    /// A `key=value` property assignment could not be parsed.
    #[error("invalid property assignment '{0}'")]
    InvalidProperty(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LexerError {
    /// The document status this error maps to.
    pub fn status(&self) -> Status {
        Status::Failure
    }
}

/// Result type for host-facing operations.
pub type Result<T> = core::result::Result<T, LexerError>;
