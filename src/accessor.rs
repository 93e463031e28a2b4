//! Buffered access to a [`Document`] for lexers.
//!
//! [`LexAccessor`] reads the text through a sliding window and collects
//! style writes in a run buffer. A lexer opens a segment with
//! [`LexAccessor::start_segment`], then closes it with
//! [`LexAccessor::colour_to`], which styles everything from the segment start
//! up to and including the given position and opens the next segment right
//! after it.
//!
//! Pending styles reach the document on [`LexAccessor::flush`], when the run
//! buffer fills, or when the accessor is dropped.
//!
//! [`Accessor`] adds the lexer's properties and indentation analysis.

use std::ops::{Deref, DerefMut};

use log::trace;

use crate::document::{Document, Encoding, Line, Position, FOLD_LEVEL_BASE, FOLD_LEVEL_WHITE_FLAG};
use crate::props::PropSetSimple;

/// Size of the read window and of the pending style buffer.
pub const BUFFER_SIZE: Position = 4000;
/// How far before a requested position the read window starts.
pub const SLOP_SIZE: Position = BUFFER_SIZE / 8;

/// Buffered reader and style writer over a document.
pub struct LexAccessor<'a> {
    doc: &'a mut dyn Document,
    buf: Vec<u8>,
    start_pos: Position,
    end_pos: Position,
    encoding: Encoding,
    len_doc: Position,
    style_buf: Vec<u8>,
    valid_len: Position,
    start_seg: Position,
    start_pos_styling: Position,
}

impl<'a> LexAccessor<'a> {
    /// Wrap `doc` for the duration of one lex or fold pass.
    pub fn new(doc: &'a mut dyn Document) -> Self {
        let len_doc = doc.len();
        let encoding = doc.encoding();
        Self {
            doc,
            buf: vec![0; BUFFER_SIZE as usize],
            start_pos: Position::MAX,
            end_pos: 0,
            encoding,
            len_doc,
            style_buf: vec![0; BUFFER_SIZE as usize],
            valid_len: 0,
            start_seg: 0,
            start_pos_styling: 0,
        }
    }

    fn fill(&mut self, position: Position) {
        self.start_pos = position - SLOP_SIZE;
        if self.start_pos + BUFFER_SIZE > self.len_doc {
            self.start_pos = self.len_doc - BUFFER_SIZE;
        }
        if self.start_pos < 0 {
            self.start_pos = 0;
        }
        self.end_pos = (self.start_pos + BUFFER_SIZE).min(self.len_doc);
        let count = (self.end_pos - self.start_pos) as usize;
        self.doc.char_range(&mut self.buf[..count], self.start_pos);
    }

    /// Byte at `position`; NUL outside the document.
    #[inline]
    pub fn char_at(&mut self, position: Position) -> u8 {
        self.safe_char_at(position, 0)
    }

    /// Byte at `position`, or `default` outside the document.
    #[inline]
    pub fn safe_char_at(&mut self, position: Position, default: u8) -> u8 {
        if position < self.start_pos || position >= self.end_pos {
            self.fill(position);
            if position < self.start_pos || position >= self.end_pos {
                return default;
            }
        }
        self.buf[(position - self.start_pos) as usize]
    }

    /// The document, for multi-byte character access.
    pub fn document(&self) -> &dyn Document {
        &*self.doc
    }

    /// Whether `ch` starts a double-byte character.
    ///
    /// Only DBCS documents have lead bytes.
    pub fn is_lead_byte(&self, ch: u8) -> bool {
        ch >= 0x80 && self.encoding == Encoding::Dbcs && self.doc.is_dbcs_lead_byte(ch)
    }

    /// Encoding of the document.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Whether the text at `position` starts with `s`.
    pub fn matches(&mut self, position: Position, s: &str) -> bool {
        s.bytes()
            .enumerate()
            .all(|(i, ch)| self.safe_char_at(position + i as Position, b' ') == ch)
    }

    /// Like [`LexAccessor::matches`] but lowercases the document text.
    ///
    /// `s` itself must already be lowercase.
    pub fn match_ignore_case(&mut self, position: Position, s: &str) -> bool {
        s.bytes().enumerate().all(|(i, ch)| {
            self.safe_char_at(position + i as Position, b' ')
                .to_ascii_lowercase()
                == ch
        })
    }

    /// Bytes in `start..end`.
    pub fn range(&mut self, start: Position, end: Position) -> Vec<u8> {
        (start..end).map(|pos| self.safe_char_at(pos, 0)).collect()
    }

    /// Bytes in `start..end`, lowercased.
    pub fn range_lowered(&mut self, start: Position, end: Position) -> Vec<u8> {
        let mut bytes = self.range(start, end);
        bytes.make_ascii_lowercase();
        bytes
    }

    /// Committed style at `position`.
    pub fn style_at(&self, position: Position) -> u8 {
        self.doc.style_at(position)
    }

    /// Style at `position`, preferring writes still pending in the buffer.
    pub fn buffer_style_at(&self, position: Position) -> u8 {
        let index = position - self.start_pos_styling;
        if index >= 0 && index < self.valid_len {
            return self.style_buf[index as usize];
        }
        self.doc.style_at(position)
    }

    /// Line containing `position`.
    pub fn line_of(&self, position: Position) -> Line {
        self.doc.line_from_position(position)
    }

    /// First position of `line`.
    pub fn line_start(&self, line: Line) -> Position {
        self.doc.line_start(line)
    }

    /// Terminator position of `line`.
    pub fn line_end(&self, line: Line) -> Position {
        self.doc.line_end(line)
    }

    /// Fold level of `line`.
    pub fn level_at(&self, line: Line) -> i32 {
        self.doc.level(line)
    }

    /// Set the fold level of `line`.
    pub fn set_level(&mut self, line: Line, level: i32) {
        self.doc.set_level(line, level);
    }

    /// Length of the document.
    pub fn len(&self) -> Position {
        self.len_doc
    }

    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.len_doc == 0
    }

    /// Line state of `line`.
    pub fn line_state(&self, line: Line) -> i32 {
        self.doc.line_state(line)
    }

    /// Set the line state of `line`.
    pub fn set_line_state(&mut self, line: Line, state: i32) -> i32 {
        self.doc.set_line_state(line, state)
    }

    /// Send pending styles to the document.
    pub fn flush(&mut self) {
        if self.valid_len > 0 {
            trace!(
                "flushing {} styles at {}",
                self.valid_len,
                self.start_pos_styling
            );
            self.doc
                .set_styles(&self.style_buf[..self.valid_len as usize]);
            self.start_pos_styling += self.valid_len;
            self.valid_len = 0;
        }
    }

    /// Declare where style writes start.
    pub fn start_at(&mut self, start: Position) {
        self.doc.start_styling(start);
        self.start_pos_styling = start;
    }

    /// Start of the open segment.
    pub fn segment_start(&self) -> Position {
        self.start_seg
    }

    /// Open a segment at `position`.
    pub fn start_segment(&mut self, position: Position) {
        self.start_seg = position;
    }

    /// Style the open segment up to and including `position`.
    ///
    /// `position == segment_start() - 1` styles nothing; positions before
    /// the segment are ignored.
    pub fn colour_to(&mut self, position: Position, style: u8) {
        if position != self.start_seg - 1 {
            if position < self.start_seg {
                return;
            }
            let run = position - self.start_seg + 1;
            if self.valid_len + run >= BUFFER_SIZE {
                self.flush();
            }
            if self.valid_len + run >= BUFFER_SIZE {
                self.doc.set_style_for(run, style);
                self.start_pos_styling += run;
            } else {
                let start = self.valid_len as usize;
                self.style_buf[start..start + run as usize].fill(style);
                self.valid_len += run;
            }
        }
        self.start_seg = position + 1;
    }

    /// Tell the host that lexer state changed for `start..end`.
    pub fn change_lexer_state(&mut self, start: Position, end: Position) {
        self.doc.change_lexer_state(start, end);
    }
}

impl Drop for LexAccessor<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Leading whitespace was indented with spaces.
pub const WS_SPACE: i32 = 1;
/// Leading whitespace was indented with tabs.
pub const WS_TAB: i32 = 2;
/// A tab followed spaces in the leading whitespace.
pub const WS_SPACE_TAB: i32 = 4;
/// The leading whitespace disagrees with the previous line's.
pub const WS_INCONSISTENT: i32 = 8;

/// Decides whether a line whose text starts at `pos` is a comment.
pub type CommentLeaderFn = fn(&mut Accessor<'_>, Position, Position) -> bool;

/// A [`LexAccessor`] that also carries the lexer's properties.
pub struct Accessor<'a> {
    inner: LexAccessor<'a>,
    props: &'a PropSetSimple,
}

impl<'a> Accessor<'a> {
    /// Wrap `doc` with `props` for one pass.
    pub fn new(doc: &'a mut dyn Document, props: &'a PropSetSimple) -> Self {
        Self {
            inner: LexAccessor::new(doc),
            props,
        }
    }

    /// The lexer's properties.
    pub fn props(&self) -> &PropSetSimple {
        self.props
    }

    /// Integer property `key`, `default` when unset or not a number.
    pub fn property_int(&self, key: &str, default: i32) -> i32 {
        self.props.get_int(key, default)
    }

    /// Indentation of `line` as a fold level.
    ///
    /// Tabs advance to the next multiple of 8. `flags` receives the
    /// `WS_*` bits describing the whitespace. Blank lines, and lines
    /// `is_comment_leader` accepts, get [`FOLD_LEVEL_WHITE_FLAG`].
    pub fn indent_amount(
        &mut self,
        line: Line,
        flags: &mut i32,
        is_comment_leader: Option<CommentLeaderFn>,
    ) -> i32 {
        let end = self.len();
        let mut space_flags = 0;

        let mut pos = self.line_start(line);
        let mut ch = self.char_at(pos);
        let mut indent = 0;
        let mut in_prev_prefix = line > 0;
        let mut pos_prev = if in_prev_prefix {
            self.line_start(line - 1)
        } else {
            0
        };
        while (ch == b' ' || ch == b'\t') && pos < end {
            if in_prev_prefix {
                let ch_prev = self.char_at(pos_prev);
                pos_prev += 1;
                if ch_prev == b' ' || ch_prev == b'\t' {
                    if ch_prev != ch {
                        space_flags |= WS_INCONSISTENT;
                    }
                } else {
                    in_prev_prefix = false;
                }
            }
            if ch == b' ' {
                space_flags |= WS_SPACE;
                indent += 1;
            } else {
                space_flags |= WS_TAB;
                if space_flags & WS_SPACE != 0 {
                    space_flags |= WS_SPACE_TAB;
                }
                indent = (indent / 8 + 1) * 8;
            }
            pos += 1;
            ch = self.char_at(pos);
        }

        *flags = space_flags;
        indent += FOLD_LEVEL_BASE;
        let blank = self.line_start(line) == end || matches!(ch, b' ' | b'\t' | b'\n' | b'\r');
        if blank || is_comment_leader.is_some_and(|leader| leader(self, pos, end - pos)) {
            indent | FOLD_LEVEL_WHITE_FLAG
        } else {
            indent
        }
    }
}

impl<'a> Deref for Accessor<'a> {
    type Target = LexAccessor<'a>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Accessor<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextDocument;

    #[test]
    fn test_char_access() {
        let mut doc = TextDocument::new("hello\nworld");
        let mut styler = LexAccessor::new(&mut doc);
        assert_eq!(styler.char_at(0), b'h');
        assert_eq!(styler.char_at(6), b'w');
        assert_eq!(styler.safe_char_at(-1, b' '), b' ');
        assert_eq!(styler.safe_char_at(100, b'x'), b'x');
        assert_eq!(styler.char_at(100), 0);
        assert!(styler.matches(6, "world"));
        assert!(!styler.matches(6, "worlds"));
        assert_eq!(styler.range(1, 4), b"ell");
    }

    #[test]
    fn test_window_refills_far_away() {
        let text: String = (0..10_000).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let mut doc = TextDocument::new(&text);
        let mut styler = LexAccessor::new(&mut doc);
        assert_eq!(styler.char_at(9_999), text.as_bytes()[9_999]);
        assert_eq!(styler.char_at(0), b'a');
        assert_eq!(styler.char_at(5_000), text.as_bytes()[5_000]);
    }

    #[test]
    fn test_match_ignore_case() {
        let mut doc = TextDocument::new("\\BEGIN{x}");
        let mut styler = LexAccessor::new(&mut doc);
        assert!(styler.match_ignore_case(1, "begin"));
        assert_eq!(styler.range_lowered(1, 6), b"begin");
    }

    #[test]
    fn test_colour_to_runs() {
        let mut doc = TextDocument::new("abcdef");
        {
            let mut styler = LexAccessor::new(&mut doc);
            styler.start_at(0);
            styler.start_segment(0);
            styler.colour_to(1, 3);
            // empty run
            styler.colour_to(1, 9);
            styler.colour_to(4, 5);
            assert_eq!(styler.buffer_style_at(0), 3);
            assert_eq!(styler.style_at(0), 0);
            styler.colour_to(5, 7);
            styler.flush();
            assert_eq!(styler.style_at(0), 3);
        }
        assert_eq!(doc.styles(), &[3, 3, 5, 5, 5, 7]);
    }

    #[test]
    fn test_colour_to_before_segment_ignored() {
        let mut doc = TextDocument::new("abcdef");
        {
            let mut styler = LexAccessor::new(&mut doc);
            styler.start_at(0);
            styler.start_segment(0);
            styler.colour_to(3, 1);
            styler.colour_to(1, 2);
            assert_eq!(styler.segment_start(), 4);
            styler.colour_to(5, 4);
        }
        assert_eq!(doc.styles(), &[1, 1, 1, 1, 4, 4]);
    }

    #[test]
    fn test_drop_flushes() {
        let mut doc = TextDocument::new("abc");
        {
            let mut styler = LexAccessor::new(&mut doc);
            styler.start_at(0);
            styler.start_segment(0);
            styler.colour_to(2, 6);
        }
        assert_eq!(doc.styles(), &[6, 6, 6]);
    }

    #[test]
    fn test_long_runs_bypass_buffer() {
        let text = "x".repeat(9_000);
        let mut doc = TextDocument::new(&text);
        {
            let mut styler = LexAccessor::new(&mut doc);
            styler.start_at(0);
            styler.start_segment(0);
            styler.colour_to(9, 1);
            styler.colour_to(8_999, 2);
        }
        assert_eq!(doc.styles()[9], 1);
        assert_eq!(doc.styles()[10], 2);
        assert_eq!(doc.styles()[8_999], 2);
    }

    #[test]
    fn test_indent_amount() {
        let mut doc = TextDocument::new("a\n    b\n\tc\n  \td\n\n   \n");
        let props = PropSetSimple::new();
        let mut styler = Accessor::new(&mut doc, &props);
        let mut flags = 0;

        assert_eq!(styler.indent_amount(0, &mut flags, None), FOLD_LEVEL_BASE);
        assert_eq!(flags, 0);

        assert_eq!(styler.indent_amount(1, &mut flags, None), FOLD_LEVEL_BASE + 4);
        assert_eq!(flags, WS_SPACE);

        assert_eq!(styler.indent_amount(2, &mut flags, None), FOLD_LEVEL_BASE + 8);
        assert_eq!(flags & WS_TAB, WS_TAB);
        assert_eq!(flags & WS_INCONSISTENT, WS_INCONSISTENT);

        assert_eq!(styler.indent_amount(3, &mut flags, None), FOLD_LEVEL_BASE + 8);
        assert_eq!(flags & WS_SPACE_TAB, WS_SPACE_TAB);

        let blank = styler.indent_amount(4, &mut flags, None);
        assert_eq!(blank & FOLD_LEVEL_WHITE_FLAG, FOLD_LEVEL_WHITE_FLAG);

        let spaces_only = styler.indent_amount(5, &mut flags, None);
        assert_eq!(spaces_only, (FOLD_LEVEL_BASE + 3) | FOLD_LEVEL_WHITE_FLAG);
    }

    #[test]
    fn test_indent_amount_comment_leader() {
        fn hash_comment(styler: &mut Accessor<'_>, pos: Position, _len: Position) -> bool {
            styler.char_at(pos) == b'#'
        }
        let mut doc = TextDocument::new("  # note\n  code\n");
        let props = PropSetSimple::new();
        let mut styler = Accessor::new(&mut doc, &props);
        let mut flags = 0;
        let comment = styler.indent_amount(0, &mut flags, Some(hash_comment));
        assert_eq!(comment & FOLD_LEVEL_WHITE_FLAG, FOLD_LEVEL_WHITE_FLAG);
        let code = styler.indent_amount(1, &mut flags, Some(hash_comment));
        assert_eq!(code, FOLD_LEVEL_BASE + 2);
    }

    #[test]
    fn test_property_int() {
        let mut doc = TextDocument::new("");
        let mut props = PropSetSimple::new();
        props.set("fold.compact", "0");
        let styler = Accessor::new(&mut doc, &props);
        assert_eq!(styler.property_int("fold.compact", 1), 0);
        assert_eq!(styler.property_int("fold.comment", 0), 0);
    }
}
