//! Character-at-a-time cursor for writing lexers.
//!
//! [`StyleContext`] walks a range of the document keeping the current,
//! previous and next characters and the current lexer state. Changing state
//! with [`StyleContext::set_state`] styles everything since the last change
//! with the old state; [`StyleContext::complete`] styles the tail and flushes.
//!
//! In UTF-8 and DBCS documents characters are decoded through the document,
//! so `ch` holds a code point and `width` its byte length.

use crate::accessor::LexAccessor;
use crate::document::{Encoding, Line, Position};

/// Forward cursor over `[start, start + length)` of a document.
pub struct StyleContext<'s, 'a> {
    styler: &'s mut LexAccessor<'a>,
    multi_byte: bool,
    end_pos: Position,
    length_document: Position,

    pos_relative: Position,
    current_pos_last_relative: Position,
    offset_relative: Position,

    /// Byte position of `ch`.
    pub current_pos: Position,
    /// Line containing `current_pos`.
    pub current_line: Line,
    /// Last line of the document.
    pub line_doc_end: Line,
    /// Start of the line after `current_line`.
    pub line_start_next: Position,
    /// `ch` is the first character of a line.
    pub at_line_start: bool,
    /// `ch` is the last character of a line (its terminator, if any).
    pub at_line_end: bool,
    /// Lexer state in effect for the open run.
    pub state: u8,
    /// Character before `ch`.
    pub ch_prev: u32,
    /// Current character.
    pub ch: u32,
    /// Width of `ch` in bytes.
    pub width: Position,
    /// Character after `ch`.
    pub ch_next: u32,
    /// Width of `ch_next` in bytes.
    pub width_next: Position,
}

impl<'s, 'a> StyleContext<'s, 'a> {
    /// Start styling at `start_pos` in state `init_style`.
    pub fn new(
        start_pos: Position,
        length: Position,
        init_style: u8,
        styler: &'s mut LexAccessor<'a>,
    ) -> Self {
        let multi_byte = styler.encoding() != Encoding::EightBit;
        styler.start_at(start_pos);
        styler.start_segment(start_pos);
        let current_line = styler.line_of(start_pos);
        let line_start_next = styler.line_start(current_line + 1);
        let length_document = styler.len();
        let mut end_pos = start_pos + length;
        if end_pos == length_document {
            end_pos += 1;
        }
        let line_doc_end = styler.line_of(length_document);
        let at_line_start = styler.line_start(current_line) == start_pos;

        let mut sc = Self {
            styler,
            multi_byte,
            end_pos,
            length_document,
            pos_relative: 0,
            current_pos_last_relative: Position::MAX,
            offset_relative: 0,
            current_pos: start_pos,
            current_line,
            line_doc_end,
            line_start_next,
            at_line_start,
            at_line_end: false,
            state: init_style,
            ch_prev: 0,
            ch: 0,
            width: 0,
            ch_next: 0,
            width_next: 1,
        };
        sc.get_next_char();
        sc.ch = sc.ch_next;
        sc.width = sc.width_next;
        sc.get_next_char();
        sc
    }

    fn get_next_char(&mut self) {
        let pos = self.current_pos + self.width;
        if self.multi_byte {
            let (ch, width) = self.styler.document().character_and_width(pos);
            self.ch_next = ch;
            self.width_next = width;
        } else {
            self.ch_next = self.styler.safe_char_at(pos, 0) as u32;
            self.width_next = 1;
        }
        self.at_line_end = if self.current_line < self.line_doc_end {
            self.current_pos >= self.line_start_next - 1
        } else {
            self.current_pos >= self.line_start_next
        };
    }

    /// The accessor underneath, for look-around the cursor does not cover.
    pub fn styler(&mut self) -> &mut LexAccessor<'a> {
        self.styler
    }

    fn close_position(&self) -> Position {
        self.current_pos - if self.current_pos > self.length_document { 2 } else { 1 }
    }

    /// Style the final run and flush. Call once, after the loop.
    pub fn complete(&mut self) {
        let pos = self.close_position();
        self.styler.colour_to(pos, self.state);
        self.styler.flush();
    }

    /// Whether the cursor is still inside the range.
    pub fn more(&self) -> bool {
        self.current_pos < self.end_pos
    }

    /// Advance one character.
    pub fn forward(&mut self) {
        if self.current_pos < self.end_pos {
            self.at_line_start = self.at_line_end;
            if self.at_line_start {
                self.current_line += 1;
                self.line_start_next = self.styler.line_start(self.current_line + 1);
            }
            self.ch_prev = self.ch;
            self.current_pos += self.width;
            self.ch = self.ch_next;
            self.width = self.width_next;
            self.get_next_char();
        } else {
            self.at_line_start = false;
            self.ch_prev = b' ' as u32;
            self.ch = b' ' as u32;
            self.ch_next = b' ' as u32;
            self.at_line_end = true;
        }
    }

    /// Advance `n` characters.
    pub fn forward_n(&mut self, n: Position) {
        for _ in 0..n {
            self.forward();
        }
    }

    /// Advance until at least `n` bytes have been passed.
    pub fn forward_bytes(&mut self, n: Position) {
        let forward_pos = self.current_pos + n;
        while forward_pos > self.current_pos && self.more() {
            self.forward();
        }
    }

    /// Retag the open run without closing it.
    pub fn change_state(&mut self, state: u8) {
        self.state = state;
    }

    /// Close the open run with the current state and switch to `state`.
    pub fn set_state(&mut self, state: u8) {
        let pos = self.close_position();
        self.styler.colour_to(pos, self.state);
        self.state = state;
    }

    /// Advance one character, then [`StyleContext::set_state`].
    pub fn forward_set_state(&mut self, state: u8) {
        self.forward();
        self.set_state(state);
    }

    /// Bytes in the open run.
    pub fn length_current(&self) -> Position {
        self.current_pos - self.styler.segment_start()
    }

    /// Byte `n` positions from the cursor, NUL outside the document.
    pub fn get_relative(&mut self, n: Position) -> u32 {
        self.styler.safe_char_at(self.current_pos + n, 0) as u32
    }

    /// Character `n` characters from the cursor.
    pub fn get_relative_character(&mut self, n: Position) -> u32 {
        if n == 0 {
            return self.ch;
        }
        if !self.multi_byte {
            return self.get_relative(n);
        }
        if self.current_pos_last_relative != self.current_pos
            || (n > 0 && (self.offset_relative < 0 || n < self.offset_relative))
            || (n < 0 && (self.offset_relative > 0 || n > self.offset_relative))
        {
            self.pos_relative = self.current_pos;
            self.offset_relative = 0;
        }
        let diff = n - self.offset_relative;
        let doc = self.styler.document();
        let pos_new = doc.relative_position(self.pos_relative, diff);
        let (ch, _) = doc.character_and_width(pos_new);
        self.pos_relative = pos_new;
        self.current_pos_last_relative = self.current_pos;
        self.offset_relative = n;
        ch
    }

    /// Whether `ch` is `ch0`.
    pub fn match_char(&self, ch0: u8) -> bool {
        self.ch == ch0 as u32
    }

    /// Whether `ch` and `ch_next` are `ch0` and `ch1`.
    pub fn match2(&self, ch0: u8, ch1: u8) -> bool {
        self.ch == ch0 as u32 && self.ch_next == ch1 as u32
    }

    /// Whether the text at the cursor starts with `s`.
    pub fn match_str(&mut self, s: &str) -> bool {
        let bytes = s.as_bytes();
        let Some(&first) = bytes.first() else {
            return true;
        };
        if self.ch != first as u32 {
            return false;
        }
        let Some(&second) = bytes.get(1) else {
            return true;
        };
        if self.ch_next != second as u32 {
            return false;
        }
        let pos = self.current_pos;
        bytes[2..]
            .iter()
            .enumerate()
            .all(|(i, &b)| self.styler.safe_char_at(pos + 2 + i as Position, 0) == b)
    }

    /// Case-insensitive [`StyleContext::match_str`]; `s` must be lowercase.
    pub fn match_ignore_case(&mut self, s: &str) -> bool {
        let lower = |ch: u32| {
            if (b'A' as u32..=b'Z' as u32).contains(&ch) {
                ch - b'A' as u32 + b'a' as u32
            } else {
                ch
            }
        };
        let bytes = s.as_bytes();
        if lower(self.ch) != bytes.first().copied().unwrap_or(0) as u32 {
            return false;
        }
        if bytes.len() < 2 {
            return true;
        }
        if lower(self.ch_next) != bytes[1] as u32 {
            return false;
        }
        let pos = self.current_pos;
        bytes[2..].iter().enumerate().all(|(i, &b)| {
            self.styler
                .safe_char_at(pos + 2 + i as Position, 0)
                .to_ascii_lowercase()
                == b
        })
    }

    /// Text of the open run.
    pub fn current_text(&mut self) -> Vec<u8> {
        let start = self.styler.segment_start();
        self.styler.range(start, self.current_pos)
    }

    /// Text of the open run, lowercased.
    pub fn current_lowered(&mut self) -> Vec<u8> {
        let start = self.styler.segment_start();
        self.styler.range_lowered(start, self.current_pos)
    }
}
