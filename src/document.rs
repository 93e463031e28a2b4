//! The text storage boundary lexers are built on.
//!
//! A [`Document`] owns the raw bytes, one style byte per position, and two
//! integers per line: an opaque line state and a fold level. Lexers never
//! touch a document directly; they go through
//! [`LexAccessor`](crate::accessor::LexAccessor), which buffers reads and
//! coalesces style writes.
//!
//! [`TextDocument`] is the in-memory implementation used by the incremental
//! styler, the CLI and the tests.

use crate::error::Status;
use crate::span::{Location, Span, StyleRun};

/// A byte offset into a document.
///
/// Signed so lexers can express "one before the start" without wrapping.
pub type Position = isize;

/// A zero-based line number.
pub type Line = isize;

/// Fold level of a top-level line.
pub const FOLD_LEVEL_BASE: i32 = 0x400;
/// Set on lines containing only whitespace.
pub const FOLD_LEVEL_WHITE_FLAG: i32 = 0x1000;
/// Set on lines that start a foldable block.
pub const FOLD_LEVEL_HEADER_FLAG: i32 = 0x2000;
/// Mask selecting the nesting depth from a fold level.
pub const FOLD_LEVEL_NUMBER_MASK: i32 = 0x0FFF;

/// Nesting depth of a fold level, relative to [`FOLD_LEVEL_BASE`].
pub fn fold_depth(level: i32) -> i32 {
    (level & FOLD_LEVEL_NUMBER_MASK) - FOLD_LEVEL_BASE
}

/// Character encoding of the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// One byte per character.
    EightBit,
    /// UTF-8.
    #[default]
    Unicode,
    /// Double-byte character sets.
    Dbcs,
}

/// Text storage seen by lexers.
///
/// Positions outside the document are tolerated by every query: reads return
/// neutral values and writes are dropped.
pub trait Document {
    /// Length of the text in bytes.
    fn len(&self) -> Position;

    /// Whether the document is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `buffer.len()` bytes starting at `position` into `buffer`.
    fn char_range(&self, buffer: &mut [u8], position: Position);

    /// Style byte at `position`, 0 outside the document.
    fn style_at(&self, position: Position) -> u8;

    /// Line containing `position`.
    fn line_from_position(&self, position: Position) -> Line;

    /// First position of `line`.
    fn line_start(&self, line: Line) -> Position;

    /// Position of the terminator of `line` (or the document end).
    fn line_end(&self, line: Line) -> Position;

    /// Fold level of `line`.
    fn level(&self, line: Line) -> i32;

    /// Set the fold level of `line`, returning the stored value.
    fn set_level(&mut self, line: Line, level: i32) -> i32;

    /// Opaque per-line state.
    fn line_state(&self, line: Line) -> i32;

    /// Set the per-line state, returning the stored value.
    fn set_line_state(&mut self, line: Line, state: i32) -> i32;

    /// Declare where the next style writes land.
    fn start_styling(&mut self, position: Position);

    /// Write `length` copies of `style`, advancing the styling position.
    fn set_style_for(&mut self, length: Position, style: u8) -> bool;

    /// Write `styles`, advancing the styling position.
    fn set_styles(&mut self, styles: &[u8]) -> bool;

    /// Record a failure status.
    fn set_error_status(&mut self, status: Status);

    /// Encoding of the text.
    fn encoding(&self) -> Encoding {
        Encoding::Unicode
    }

    /// Whether `ch` starts a double-byte character.
    fn is_dbcs_lead_byte(&self, _ch: u8) -> bool {
        false
    }

    /// Character at `position` and its width in bytes.
    ///
    /// Past the end this is NUL with width 1.
    fn character_and_width(&self, position: Position) -> (u32, Position);

    /// Position `offset` characters away from `start`.
    fn relative_position(&self, start: Position, offset: Position) -> Position;

    /// Notification that lexer state changed between `start` and `end`.
    fn change_lexer_state(&mut self, _start: Position, _end: Position) {}
}

const UTF8_BYTES_OF_LEAD: [u8; 256] = {
    let mut table = [1u8; 256];
    let mut i = 0xC2;
    while i < 0xE0 {
        table[i] = 2;
        i += 1;
    }
    while i < 0xF0 {
        table[i] = 3;
        i += 1;
    }
    while i < 0xF5 {
        table[i] = 4;
        i += 1;
    }
    table
};

fn utf8_is_trail_byte(ch: u8) -> bool {
    (0x80..0xC0).contains(&ch)
}

/// An in-memory [`Document`].
#[derive(Debug, Clone, Default)]
pub struct TextDocument {
    text: Vec<u8>,
    styles: Vec<u8>,
    /// Start of every line followed by the document length.
    line_starts: Vec<Position>,
    line_states: Vec<i32>,
    levels: Vec<i32>,
    end_styled: Position,
    status: Status,
    encoding: Encoding,
}

impl TextDocument {
    /// Create a UTF-8 document holding `text`.
    pub fn new(text: impl AsRef<[u8]>) -> Self {
        let mut doc = Self::default();
        doc.set_text(text);
        doc
    }

    /// Create a document with a specific encoding.
    pub fn with_encoding(text: impl AsRef<[u8]>, encoding: Encoding) -> Self {
        let mut doc = Self::new(text);
        doc.encoding = encoding;
        doc
    }

    /// Replace the whole text, resetting styles, states and levels.
    pub fn set_text(&mut self, text: impl AsRef<[u8]>) {
        self.text = text.as_ref().to_vec();
        self.styles = vec![0; self.text.len()];
        self.end_styled = 0;
        self.rebuild_line_starts();
        let lines = self.line_count() as usize;
        self.line_states = vec![0; lines];
        self.levels = vec![FOLD_LEVEL_BASE; lines];
    }

    /// The raw text.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// The text as a string, replacing invalid UTF-8.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.text).into_owned()
    }

    /// One style byte per text byte.
    pub fn styles(&self) -> &[u8] {
        &self.styles
    }

    /// Fold level of every line.
    pub fn levels(&self) -> &[i32] {
        &self.levels
    }

    /// Line state of every line.
    pub fn line_states(&self) -> &[i32] {
        &self.line_states
    }

    /// Number of lines; a trailing terminator starts an empty last line.
    pub fn line_count(&self) -> Line {
        (self.line_starts.len() - 1) as Line
    }

    /// The last recorded error status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Clear the error status.
    pub fn reset_status(&mut self) {
        self.status = Status::Ok;
    }

    /// Replace `start..end` with `new_text`.
    ///
    /// Styles of the untouched text move with it; inserted bytes get style 0.
    /// Line states and fold levels of the lines around the edit are kept and
    /// new lines are inserted after the first edited line.
    pub fn replace(&mut self, start: usize, end: usize, new_text: &[u8]) {
        let start = start.min(self.text.len());
        let end = end.clamp(start, self.text.len());
        let old_lines = self.line_count();
        let first_line = self.line_from_position(start as Position);

        self.text.splice(start..end, new_text.iter().copied());
        self.styles
            .splice(start..end, std::iter::repeat(0).take(new_text.len()));
        self.rebuild_line_starts();

        let delta = self.line_count() - old_lines;
        let at = (first_line + 1) as usize;
        if delta > 0 {
            let level = self
                .levels
                .get(first_line as usize)
                .copied()
                .unwrap_or(FOLD_LEVEL_BASE);
            let count = delta as usize;
            self.line_states
                .splice(at..at, std::iter::repeat(0).take(count));
            self.levels.splice(at..at, std::iter::repeat(level).take(count));
        } else if delta < 0 {
            let count = (-delta) as usize;
            let upto = (at + count).min(self.levels.len());
            self.line_states.drain(at.min(upto)..upto);
            self.levels.drain(at.min(upto)..upto);
        }
        self.end_styled = self.end_styled.min(start as Position);
    }

    /// Maximal runs of equal style, with line/column spans.
    pub fn style_runs(&self) -> Vec<StyleRun> {
        let mut runs = Vec::new();
        let mut start = 0usize;
        while start < self.styles.len() {
            let style = self.styles[start];
            let mut end = start + 1;
            while end < self.styles.len() && self.styles[end] == style {
                end += 1;
            }
            let span = Span::new(
                start,
                end,
                self.location_of(start),
                self.location_of(end),
            );
            runs.push(StyleRun { span, style });
            start = end;
        }
        runs
    }

    /// 1-based line and column (in characters) of a byte offset.
    pub fn location_of(&self, position: usize) -> Location {
        let line = self.line_from_position(position as Position);
        let line_start = self.line_start(line) as usize;
        let end = position.min(self.text.len());
        let column = String::from_utf8_lossy(&self.text[line_start.min(end)..end])
            .chars()
            .count();
        Location::at(line as u32 + 1, column as u32 + 1)
    }

    fn rebuild_line_starts(&mut self) {
        self.line_starts.clear();
        self.line_starts.push(0);
        let len = self.text.len();
        let mut pos = 0;
        while pos < len {
            match self.text[pos] {
                b'\n' => self.line_starts.push((pos + 1) as Position),
                b'\r' if self.text.get(pos + 1) != Some(&b'\n') => {
                    self.line_starts.push((pos + 1) as Position)
                }
                _ => {}
            }
            pos += 1;
        }
        self.line_starts.push(len as Position);
    }

    fn line_index(&self, line: Line) -> Option<usize> {
        if line < 0 || line >= self.line_count() {
            None
        } else {
            Some(line as usize)
        }
    }
}

impl Document for TextDocument {
    fn len(&self) -> Position {
        self.text.len() as Position
    }

    fn char_range(&self, buffer: &mut [u8], position: Position) {
        let start = position.max(0) as usize;
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = self.text.get(start + i).copied().unwrap_or(0);
        }
    }

    fn style_at(&self, position: Position) -> u8 {
        if position < 0 {
            return 0;
        }
        self.styles.get(position as usize).copied().unwrap_or(0)
    }

    fn line_from_position(&self, position: Position) -> Line {
        if position >= self.len() {
            return self.line_count() - 1;
        }
        if position <= 0 {
            return 0;
        }
        let after = self.line_starts.partition_point(|&start| start <= position);
        (after as Line - 1).max(0)
    }

    fn line_start(&self, line: Line) -> Position {
        if line < 0 {
            return 0;
        }
        match self.line_starts.get(line as usize) {
            Some(&start) => start,
            None => self.len(),
        }
    }

    fn line_end(&self, line: Line) -> Position {
        let start = self.line_start(line);
        let mut end = self.line_start(line + 1);
        if end > start && self.text[(end - 1) as usize] == b'\n' {
            end -= 1;
        }
        if end > start && self.text[(end - 1) as usize] == b'\r' {
            end -= 1;
        }
        end
    }

    fn level(&self, line: Line) -> i32 {
        self.line_index(line)
            .map(|i| self.levels[i])
            .unwrap_or(FOLD_LEVEL_BASE)
    }

    fn set_level(&mut self, line: Line, level: i32) -> i32 {
        if let Some(i) = self.line_index(line) {
            self.levels[i] = level;
        }
        level
    }

    fn line_state(&self, line: Line) -> i32 {
        self.line_index(line).map(|i| self.line_states[i]).unwrap_or(0)
    }

    fn set_line_state(&mut self, line: Line, state: i32) -> i32 {
        if let Some(i) = self.line_index(line) {
            self.line_states[i] = state;
        }
        state
    }

    fn start_styling(&mut self, position: Position) {
        self.end_styled = position;
    }

    fn set_style_for(&mut self, length: Position, style: u8) -> bool {
        for _ in 0..length.max(0) {
            if let Some(slot) = self.styles.get_mut(self.end_styled as usize) {
                *slot = style;
            }
            self.end_styled += 1;
        }
        true
    }

    fn set_styles(&mut self, styles: &[u8]) -> bool {
        for &style in styles {
            if self.end_styled >= 0 {
                if let Some(slot) = self.styles.get_mut(self.end_styled as usize) {
                    *slot = style;
                }
            }
            self.end_styled += 1;
        }
        true
    }

    fn set_error_status(&mut self, status: Status) {
        self.status = status;
    }

    fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn character_and_width(&self, position: Position) -> (u32, Position) {
        if position < 0 || position >= self.len() {
            return (0, 1);
        }
        let pos = position as usize;
        let lead = self.text[pos];
        if lead < 0x80 || self.encoding != Encoding::Unicode {
            return (lead as u32, 1);
        }
        let width = UTF8_BYTES_OF_LEAD[lead as usize] as usize;
        let bytes = &self.text[pos..(pos + width).min(self.text.len())];
        if bytes.len() < width || !bytes[1..].iter().all(|&b| utf8_is_trail_byte(b)) {
            return (lead as u32, 1);
        }
        let value = match width {
            1 => lead as u32,
            2 => ((lead as u32 & 0x1F) << 6) | (bytes[1] as u32 & 0x3F),
            3 => {
                ((lead as u32 & 0x0F) << 12)
                    | ((bytes[1] as u32 & 0x3F) << 6)
                    | (bytes[2] as u32 & 0x3F)
            }
            _ => {
                ((lead as u32 & 0x07) << 18)
                    | ((bytes[1] as u32 & 0x3F) << 12)
                    | ((bytes[2] as u32 & 0x3F) << 6)
                    | (bytes[3] as u32 & 0x3F)
            }
        };
        (value, width as Position)
    }

    fn relative_position(&self, start: Position, offset: Position) -> Position {
        let mut pos = start;
        let mut remaining = offset;
        while remaining < 0 {
            if pos <= 0 {
                return 0;
            }
            pos -= 1;
            if self.encoding == Encoding::Unicode {
                while pos > 0 && utf8_is_trail_byte(self.text[pos as usize]) {
                    pos -= 1;
                }
            }
            remaining += 1;
        }
        while remaining > 0 {
            let (_, width) = self.character_and_width(pos);
            pos += width;
            remaining -= 1;
        }
        pos
    }
}
