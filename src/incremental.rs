//! Incremental restyling after edits.
//!
//! [`IncrementalStyler`] owns a document and the lexer for its language.
//! After an edit it does not trust anything the lexer remembers: it picks a
//! restart point from the committed styles alone with
//! [`find_safe_restart_point`], lets the lexer resynchronize backwards from
//! there, and restyles to the end of the document. Everything before the
//! restart point is reused as is.
//!
//! # Example
//!
//! ```rust
//! use scilex::{Edit, IncrementalStyler, Registry};
//!
//! let registry = Registry::standard();
//! let lexer = registry.create_by_name("props").unwrap();
//! let mut styler = IncrementalStyler::new("[a]\nx=1\n", lexer);
//!
//! let stats = styler.apply_edit(Edit::insert(4, "y=2\n")).unwrap();
//! assert_eq!(styler.document().text(), b"[a]\ny=2\nx=1\n");
//! assert_eq!(stats.bytes_reused, 4);
//! ```

use log::{debug, trace};

use crate::document::{Document, Position, TextDocument};
use crate::error::{LexerError, Result};
use crate::language::Lexer;

/// Replacement of `start..end` of the old text with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Byte offset where the edit starts (inclusive).
    pub start: usize,
    /// Byte offset where the edit ends (exclusive), in the old text.
    pub end: usize,
    /// Text replacing `start..end`.
    pub new_text: String,
}

impl Edit {
    /// Replace `start..end` with `new_text`.
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }

    /// Insert `text` at `pos`.
    pub fn insert(pos: usize, text: impl Into<String>) -> Self {
        Self::new(pos, pos, text)
    }

    /// Delete `start..end`.
    pub fn delete(start: usize, end: usize) -> Self {
        Self::new(start, end, "")
    }

    /// Change in document length.
    pub fn delta(&self) -> isize {
        self.new_text.len() as isize - (self.end as isize - self.start as isize)
    }
}

/// What an edit cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncrementalStats {
    /// Bytes before the restart point whose styles were kept.
    pub bytes_reused: usize,
    /// Bytes handed to the lexer.
    pub bytes_restyled: usize,
    /// Whether the whole document was restyled.
    pub full_relex: bool,
}

impl IncrementalStats {
    fn accumulate(&mut self, other: IncrementalStats) {
        self.bytes_reused += other.bytes_reused;
        self.bytes_restyled += other.bytes_restyled;
        self.full_relex |= other.full_relex;
    }
}

/// Where to restart lexing after a change at `position`.
///
/// Returns the start of the line holding `position` and the style in effect
/// just before it. Only the text and the committed styles are consulted;
/// lexers that need more context back up further on their own.
pub fn find_safe_restart_point(doc: &dyn Document, position: Position) -> (Position, u8) {
    let position = position.clamp(0, doc.len());
    let line = doc.line_from_position(position);
    let start = doc.line_start(line);
    let init_style = if start > 0 { doc.style_at(start - 1) } else { 0 };
    trace!(
        "restart for {} at {} (line {}, style {})",
        position,
        start,
        line,
        init_style
    );
    (start, init_style)
}

/// A document kept styled and folded across edits.
pub struct IncrementalStyler {
    document: TextDocument,
    lexer: Box<dyn Lexer>,
    last_stats: IncrementalStats,
}

impl IncrementalStyler {
    /// Style and fold `source` with `lexer`.
    pub fn new(source: impl AsRef<[u8]>, lexer: Box<dyn Lexer>) -> Self {
        let mut styler = Self {
            document: TextDocument::new(source),
            lexer,
            last_stats: IncrementalStats::default(),
        };
        styler.relex_all();
        styler
    }

    /// The styled document.
    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    /// One style byte per document byte.
    pub fn styles(&self) -> &[u8] {
        self.document.styles()
    }

    /// The lexer, for changing properties or word lists.
    ///
    /// Call [`IncrementalStyler::relex_all`] afterwards when a setting
    /// reports a change.
    pub fn lexer_mut(&mut self) -> &mut dyn Lexer {
        self.lexer.as_mut()
    }

    /// Statistics of the last operation.
    pub fn last_stats(&self) -> IncrementalStats {
        self.last_stats
    }

    /// Apply one edit and restyle what it may have affected.
    pub fn apply_edit(&mut self, edit: Edit) -> Result<IncrementalStats> {
        let len = self.document.text().len();
        if edit.start > edit.end || edit.end > len {
            return Err(LexerError::InvalidEdit {
                start: edit.start,
                end: edit.end,
                len,
            });
        }

        self.document
            .replace(edit.start, edit.end, edit.new_text.as_bytes());
        let (restart, init_style) =
            find_safe_restart_point(&self.document, edit.start as Position);
        let stats = self.restyle_from(restart, init_style);
        debug!(
            "{}: edit {}..{} ({:+} bytes), reused {} restyled {}",
            self.lexer.name(),
            edit.start,
            edit.end,
            edit.delta(),
            stats.bytes_reused,
            stats.bytes_restyled
        );
        self.last_stats = stats;
        Ok(stats)
    }

    /// Apply edits in order. Each edit's offsets refer to the text left by
    /// the ones before it.
    pub fn apply_edits(
        &mut self,
        edits: impl IntoIterator<Item = Edit>,
    ) -> Result<IncrementalStats> {
        let mut total = IncrementalStats::default();
        for edit in edits {
            total.accumulate(self.apply_edit(edit)?);
        }
        self.last_stats = total;
        Ok(total)
    }

    /// Replace the whole text.
    pub fn set_source(&mut self, source: impl AsRef<[u8]>) {
        self.document.set_text(source);
        self.relex_all();
    }

    /// Restyle and refold the whole document.
    pub fn relex_all(&mut self) -> IncrementalStats {
        self.document.reset_status();
        let stats = self.restyle_from(0, 0);
        debug!("{}: full relex of {} bytes", self.lexer.name(), stats.bytes_restyled);
        self.last_stats = stats;
        stats
    }

    fn restyle_from(&mut self, start: Position, init_style: u8) -> IncrementalStats {
        let len = self.document.len();
        self.lexer
            .lex(start, len - start, init_style, &mut self.document);

        // a line's fold level depends on the one before it
        let line = self.document.line_from_position(start);
        let fold_start = self.document.line_start((line - 1).max(0));
        let fold_style = if fold_start > 0 {
            self.document.style_at(fold_start - 1)
        } else {
            0
        };
        self.lexer
            .fold(fold_start, len - fold_start, fold_style, &mut self.document);

        IncrementalStats {
            bytes_reused: start as usize,
            bytes_restyled: (len - start) as usize,
            full_relex: start == 0,
        }
    }
}

impl std::fmt::Debug for IncrementalStyler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncrementalStyler")
            .field("lexer", &self.lexer.name())
            .field("len", &self.document.len())
            .field("last_stats", &self.last_stats)
            .finish()
    }
}
