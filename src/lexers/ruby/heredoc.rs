//! Quote and heredoc tracking, and the lookahead that decides whether `<<`
//! opens a heredoc.
//!
//! `<<` is ambiguous in Ruby. Without a symbol table the lexer guesses from
//! committed styles: after `undef`, `def` or `alias` it is an operator, and
//! `name <<X` only opens a heredoc when a line beginning with `X` follows
//! within fifty lines. Both checks accept some false answers.

use super::style::{
    actual_style, CLASS_VAR, HERE_DELIM, HERE_Q, HERE_QQ, HERE_QX, IDENTIFIER, INSTANCE_VAR,
    OPERATOR, SYMBOL, WORD, WORD_DEMOTED,
};
use super::MAX_KEYWORD_LENGTH;
use crate::accessor::Accessor;
use crate::charset::{is_eol, is_safe_alnum, is_space_or_tab};
use crate::document::{Line, Position};

/// Longest heredoc delimiter collected before lexing stops with an error.
pub const MAX_DELIMITER: usize = 255;

/// Lines searched for the terminator of an ambiguous heredoc.
const TERMINATOR_SEARCH_LINES: Line = 50;

/// Closing bracket for an opening one; anything else closes itself.
pub fn opposite(ch: u8) -> u8 {
    match ch {
        b'(' => b')',
        b'[' => b']',
        b'{' => b'}',
        b'<' => b'>',
        _ => ch,
    }
}

/// Delimiters of the string being scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quote {
    /// Openers not yet closed.
    pub count: i32,
    pub up: u8,
    pub down: u8,
}

impl Quote {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn open(&mut self, up: u8) {
        self.count += 1;
        self.up = up;
        self.down = opposite(up);
    }
}

/// Progress through a heredoc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HereDocState {
    /// `<<` seen.
    #[default]
    Opened,
    /// Collecting the delimiter, or past it on the `<<` line.
    Delimiter,
    /// In the body.
    Body,
}

#[derive(Debug, Default)]
pub struct HereDoc {
    pub state: HereDocState,
    /// The byte after `<<` (and `-`/`~`).
    pub quote: u8,
    pub quoted: bool,
    pub delimiter: Vec<u8>,
    /// `<<-` and `<<~` allow an indented terminator.
    pub can_be_indented: bool,
}

impl HereDoc {
    /// Style of the body. A bare delimiter keeps the plain body style.
    pub fn body_state(&self) -> u8 {
        match (self.quoted, self.quote) {
            (true, b'"') => HERE_QQ,
            (true, b'`') => HERE_QX,
            _ => HERE_Q,
        }
    }

    /// Only a single-quoted delimiter turns off `#{...}` in the body.
    pub fn interpolates(&self) -> bool {
        !(self.quoted && self.quote == b'\'')
    }
}

/// Whether `val` is at `pos`, requiring at least one byte after it before
/// `length_doc`.
pub fn is_match(styler: &mut Accessor<'_>, length_doc: Position, pos: Position, val: &[u8]) -> bool {
    if pos + val.len() as Position >= length_doc {
        return false;
    }
    val.iter()
        .enumerate()
        .all(|(k, &ch)| styler.char_at(pos + k as Position) == ch)
}

/// Whether the delimiter at `pos` is preceded only by blanks on its line.
pub fn looking_at_here_doc_delim(
    styler: &mut Accessor<'_>,
    pos: Position,
    length_doc: Position,
    delimiter: &[u8],
) -> bool {
    if !is_match(styler, length_doc, pos, delimiter) {
        return false;
    }
    let mut pos = pos - 1;
    while pos > 0 {
        let ch = styler.char_at(pos);
        if is_eol(ch) {
            return true;
        } else if !is_space_or_tab(ch) {
            return false;
        }
        pos -= 1;
    }
    false
}

/// Whether the line ending just before `pos` holds a heredoc delimiter.
///
/// `pos` is the line terminator; on success it moves to the delimiter.
pub fn curr_line_contains_here_delims(pos: &mut Position, styler: &mut Accessor<'_>) -> bool {
    if *pos <= 1 {
        return false;
    }
    let mut scan = *pos - 1;
    while scan > 0 {
        if is_eol(styler.safe_char_at(scan, b' ')) {
            return false;
        }
        styler.flush();
        if actual_style(styler.style_at(scan)) == HERE_DELIM {
            break;
        }
        scan -= 1;
    }
    if scan == 0 {
        return false;
    }
    *pos = scan;
    true
}

/// First position in `start..end` that is not a space or tab.
pub fn skip_whitespace(start: Position, end: Position, styler: &mut Accessor<'_>) -> Position {
    (start..end)
        .find(|&pos| !is_space_or_tab(styler.char_at(pos)))
        .unwrap_or(end)
}

/// Whether `<<` at `i_prev` opens a heredoc when a value is expected.
///
/// Rejects `undef foo, <<` and friends. The first word of the line is left in
/// `prev_word`.
pub fn sure_this_is_heredoc(
    i_prev: Position,
    styler: &mut Accessor<'_>,
    prev_word: &mut Vec<u8>,
) -> bool {
    let line_start = styler.line_start(styler.line_of(i_prev));
    styler.flush();

    let first_word = skip_whitespace(line_start, i_prev, styler);
    if first_word >= i_prev {
        return true;
    }
    let prev_style = styler.style_at(first_word);
    if !matches!(prev_style, WORD | WORD_DEMOTED | IDENTIFIER) {
        return true;
    }
    prev_word.clear();
    let mut end = first_word;
    while end < i_prev && styler.style_at(end) == prev_style && prev_word.len() < MAX_KEYWORD_LENGTH {
        prev_word.push(styler.char_at(end));
        end += 1;
    }
    !matches!(prev_word.as_slice(), b"undef" | b"def" | b"alias")
}

fn have_target_match(
    curr: Position,
    length_doc: Position,
    target_start: Position,
    target_end: Position,
    styler: &mut Accessor<'_>,
) -> bool {
    if length_doc - curr < target_end - target_start {
        return false;
    }
    (target_start..target_end)
        .zip(curr..length_doc)
        .all(|(target, here)| styler.char_at(target) == styler.char_at(here))
}

/// Start of the expression containing `pos`, no earlier than `min_pos`.
fn find_expression_start(pos: Position, min_pos: Position, styler: &mut Accessor<'_>) -> Position {
    let mut depth = 0;
    let mut pos = pos;
    while pos > min_pos {
        if styler.style_at(pos - 1) == OPERATOR {
            match styler.char_at(pos - 1) {
                b'}' | b')' | b']' => depth += 1,
                b'{' | b'(' | b'[' => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                b';' if depth == 0 => break,
                _ => {}
            }
        }
        pos -= 1;
    }
    pos
}

/// Whether `<<` at `lt2_start`, following a value, is an operator.
///
/// Handles `^ident(.ident|::ident)* [:sym] <<TARGET`: it is a heredoc only
/// when `TARGET` is followed by a comment or the line end and some later
/// line starts with `TARGET`.
pub fn sure_this_is_not_heredoc(lt2_start: Position, styler: &mut Accessor<'_>) -> bool {
    const DEFINITELY_NOT: bool = true;
    const LOOKS_LIKE: bool = false;

    let length_doc = styler.len();
    let line = styler.line_of(lt2_start);
    let line_start = styler.line_start(line);
    styler.flush();

    let expr_start = find_expression_start(lt2_start, line_start, styler);
    let mut first_word = skip_whitespace(expr_start, lt2_start, styler);
    if first_word >= lt2_start {
        return DEFINITELY_NOT;
    }
    let mut prev_style = styler.style_at(first_word);
    if !matches!(prev_style, IDENTIFIER | SYMBOL | INSTANCE_VAR | CLASS_VAR) {
        return DEFINITELY_NOT;
    }

    let mut new_style = prev_style;
    first_word += 1;
    while first_word <= lt2_start {
        while first_word <= lt2_start {
            new_style = styler.style_at(first_word);
            if new_style != prev_style {
                break;
            }
            first_word += 1;
        }
        if first_word < lt2_start && new_style == OPERATOR {
            match styler.char_at(first_word) {
                b'.' => {}
                b':' => {
                    first_word += 1;
                    if styler.style_at(first_word) != OPERATOR || styler.char_at(first_word) != b':' {
                        return DEFINITELY_NOT;
                    }
                }
                _ => break,
            }
        } else {
            break;
        }
        // Only identifiers can follow a receiver.
        prev_style = IDENTIFIER;
        first_word += 1;
    }

    first_word = skip_whitespace(first_word, lt2_start, styler);
    // A symbol here is an implicit hash argument.
    if first_word < lt2_start && styler.style_at(first_word) == SYMBOL {
        while first_word <= lt2_start && styler.style_at(first_word) == SYMBOL {
            first_word += 1;
        }
        first_word = skip_whitespace(first_word, lt2_start, styler);
    }
    if first_word != lt2_start {
        return DEFINITELY_NOT;
    }

    let mut j = first_word + 1;
    if styler.style_at(j) != OPERATOR || styler.char_at(j) != b'<' {
        return DEFINITELY_NOT;
    }
    let next_line_start = styler.line_start(line + 1);
    if next_line_start >= length_doc {
        return DEFINITELY_NOT;
    }
    j = skip_whitespace(j + 1, next_line_start, styler);
    if j >= length_doc {
        return DEFINITELY_NOT;
    }

    // Only reading from here on.
    let allow_indent = matches!(styler.char_at(j), b'-' | b'~');
    if allow_indent {
        j += 1;
    }
    let target_quote = match styler.char_at(j) {
        quote @ (b'\'' | b'"' | b'`') => {
            j += 1;
            Some(quote)
        }
        _ => None,
    };
    if !is_safe_alnum(styler.char_at(j)) {
        return DEFINITELY_NOT;
    }
    let target_start = j;
    let mut target_end = j;
    j += 1;
    while j < length_doc {
        let ch = styler.char_at(j);
        if !is_safe_alnum(ch) {
            if target_quote.is_some_and(|quote| ch != quote) {
                return DEFINITELY_NOT;
            }
            target_end = j;
            if target_quote.is_some() {
                j += 1;
            }
            j = skip_whitespace(j, length_doc, styler);
            if j >= length_doc {
                return DEFINITELY_NOT;
            }
            let ch = styler.char_at(j);
            if ch == b'#' || is_eol(ch) {
                break;
            }
            return DEFINITELY_NOT;
        }
        j += 1;
    }

    let last_line = styler
        .line_of(length_doc - 1)
        .min(line + TERMINATOR_SEARCH_LINES);
    for line_num in line + 1..=last_line {
        let line_begin = styler.line_start(line_num);
        let start = if allow_indent {
            skip_whitespace(line_begin, length_doc, styler)
        } else {
            line_begin
        };
        if have_target_match(start, length_doc, target_start, target_end, styler) {
            return LOOKS_LIKE;
        }
    }
    DEFINITELY_NOT
}
