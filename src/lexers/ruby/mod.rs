//! Ruby.
//!
//! A byte-at-a-time state machine over the [`Accessor`]. Ruby cannot be
//! lexed without knowing whether a value or an operator comes next (`/`
//! starts a regex or divides, `<<` opens a heredoc or shifts, `%` opens a
//! string or takes a modulus), so the scanner keeps a `prefer_re` flag that
//! is set wherever an expression may begin.
//!
//! Nothing survives between calls. Each pass first walks back to a line that
//! ended in plain code (see [`synchronize_doc_start`]) and lexes from there.

mod fold;
mod heredoc;
pub mod style;

use log::{trace, warn};

use self::heredoc::{
    curr_line_contains_here_delims, is_match, looking_at_here_doc_delim, sure_this_is_heredoc,
    sure_this_is_not_heredoc, HereDoc, HereDocState, Quote, MAX_DELIMITER,
};
use self::style::*;
use crate::accessor::Accessor;
use crate::charset::{
    is_digit, is_eol, is_high_bit, is_operator, is_safe_alpha, is_space_char, is_space_or_tab,
    is_word_char_or_high, is_word_start,
};
use crate::document::{Line, Position};
use crate::language::LexerModule;
use crate::wordlist::WordList;

/// The Ruby language.
pub const MODULE: LexerModule = LexerModule::new(
    22,
    "ruby",
    colourise,
    Some(fold::fold),
    WORD_LISTS,
    STYLES,
);

const WORD_LISTS: &[&str] = &["Keywords"];

/// Longest word compared against the keyword list.
pub(crate) const MAX_KEYWORD_LENGTH: usize = 200;

/// Deepest `#{...}` nesting followed; deeper interpolation stays string.
pub const INNER_STRINGS_MAX_COUNT: usize = 5;

/// A string interrupted by `#{`.
#[derive(Debug, Clone, Copy)]
struct InnerExpression {
    state: u8,
    brace_counts: i32,
    quote: Quote,
}

/// Walk back from `start` to the start of a line the lexer can begin on.
///
/// A line qualifies when the line before it ended in `DEFAULT` style, was not
/// continued with a backslash and held no heredoc delimiter. Returns the new
/// start, the stretched length and the style to start in.
///
/// Only styles are consulted, so a `#{` left open across a line break
/// (`"a #{\nb\n} c"`) cannot be recovered: the lines inside it end in
/// `DEFAULT` and a pass starting there loses the enclosing string.
fn synchronize_doc_start(
    start: Position,
    length: Position,
    init_style: u8,
    styler: &mut Accessor<'_>,
) -> (Position, Position, u8) {
    styler.flush();
    if matches!(actual_style(styler.style_at(start)), STDIN | STDOUT | STDERR) {
        return (start, length, init_style);
    }

    let mut line = styler.line_of(start);
    while line > 0 {
        let mut pos = styler.line_start(line) - 1;
        if pos <= 10 {
            line = 0;
            break;
        }
        let ch = styler.safe_char_at(pos, b' ');
        let ch_prev = styler.safe_char_at(pos - 1, b' ');
        if ch == b'\n' && ch_prev == b'\r' {
            pos -= 1;
        }
        if styler.safe_char_at(pos - 1, b' ') == b'\\' {
            // continuation line
        } else if actual_style(styler.style_at(pos)) != DEFAULT {
            // inside a multi-line construct
        } else if curr_line_contains_here_delims(&mut pos, styler) {
            // heredoc body follows
        } else {
            break;
        }
        line -= 1;
    }

    let pos = styler.line_start(line);
    if pos != start {
        trace!("ruby: resynchronized {} back to {}", start, pos);
    }
    (pos, length + (start - pos), DEFAULT)
}

/// Lex `[start, start + length)`.
pub fn colourise(
    start: Position,
    length: Position,
    init_style: u8,
    word_lists: &[WordList],
    styler: &mut Accessor<'_>,
) {
    let empty = WordList::new();
    let keywords = word_lists.first().unwrap_or(&empty);
    let (start, length, init_style) = synchronize_doc_start(start, length, init_style, styler);
    if length == 0 {
        return;
    }
    let mut scan = Colouriser {
        styler,
        keywords,
        length_doc: start + length,
        i: start,
        ch: 0,
        ch_next: 0,
        ch_next2: 0,
        ch_prev: 0,
        state: init_style,
        prefer_re: true,
        prev_word: Vec::new(),
        quote: Quote::default(),
        here_doc: HereDoc::default(),
        inner: Vec::with_capacity(INNER_STRINGS_MAX_COUNT),
        brace_counts: 0,
        num_dots: 0,
        is_real_number: true,
    };
    scan.run(start);
}

struct Colouriser<'s, 'a> {
    styler: &'s mut Accessor<'a>,
    keywords: &'s WordList,
    length_doc: Position,
    i: Position,
    ch: u8,
    ch_next: u8,
    ch_next2: u8,
    ch_prev: u8,
    state: u8,
    /// An expression may start here, so `/`, `<<`, `%` and `?` open literals.
    prefer_re: bool,
    /// Last keyword classified, empty after any other word.
    prev_word: Vec<u8>,
    quote: Quote,
    here_doc: HereDoc,
    /// Strings interrupted by `#{`, innermost last.
    inner: Vec<InnerExpression>,
    /// Unclosed `{` in the current interpolation.
    brace_counts: i32,
    num_dots: i32,
    /// False while lexing a `?c` character code.
    is_real_number: bool,
}

impl Colouriser<'_, '_> {
    fn run(&mut self, start: Position) {
        self.ch_prev = self.styler.safe_char_at(start - 1, b' ');
        self.ch_next = self.styler.safe_char_at(start, b' ');
        self.styler.start_at(start);
        self.styler.start_segment(start);

        self.i = start;
        while self.i < self.length_doc {
            self.ch = self.ch_next;
            self.ch_next = self.styler.safe_char_at(self.i + 1, b' ');
            self.ch_next2 = self.styler.safe_char_at(self.i + 2, b' ');

            if self.styler.is_lead_byte(self.ch) {
                self.ch_next = self.ch_next2;
                self.ch_prev = b' ';
                self.i += 2;
                continue;
            }

            if self.here_doc.state == HereDocState::Delimiter && is_eol(self.ch) {
                // The body starts on the next line.
                self.here_doc.state = HereDocState::Body;
                self.styler.colour_to(self.i - 1, self.state);
                self.state = self.here_doc.body_state();
            }

            match self.state {
                DEFAULT => self.scan_default(),
                WORD => self.scan_word(),
                NUMBER => self.scan_number(),
                COMMENTLINE => {
                    if is_eol(self.ch) {
                        // a comment never continues the statement before it
                        self.styler.colour_to(self.i - 1, self.state);
                        self.state = DEFAULT;
                        self.prefer_re = true;
                    }
                }
                HERE_DELIM => self.scan_here_delim(),
                HERE_Q | HERE_QQ | HERE_QX => self.scan_here_body(),
                CLASS_VAR | INSTANCE_VAR | SYMBOL => self.scan_variable(),
                GLOBAL => self.scan_global(),
                POD => self.scan_pod(),
                REGEX | STRING_QR => self.scan_regex(),
                STRING_Q | STRING_QQ | STRING_QX | STRING_QW | STRING_W | STRING_I | STRING_QI
                | STRING_QS | STRING | CHARACTER | BACKTICKS => self.scan_string(),
                _ => {}
            }

            if self.state == ERROR {
                // The rest of the range stays unstyled.
                self.styler.colour_to(self.i, ERROR);
                return;
            }
            self.ch_prev = self.ch;
            self.i += 1;
        }

        if self.state == WORD {
            let word_start = self.styler.segment_start();
            self.classify_word(word_start, self.length_doc - 1);
        } else {
            self.styler.colour_to(self.length_doc - 1, self.state);
        }
    }

    fn advance(&mut self) {
        self.i += 1;
        self.ch = self.ch_next;
        self.ch_next = self.ch_next2;
    }

    /// Give the current byte back to be lexed again in `DEFAULT`.
    fn redo(&mut self) {
        self.i -= 1;
        self.ch_next2 = self.ch_next;
        self.ch_next = self.ch;
        self.state = DEFAULT;
    }

    /// Jump to `i`, reloading the current and next bytes.
    fn skip_to(&mut self, i: Position) {
        self.i = i;
        self.ch = self.styler.safe_char_at(i, b' ');
        self.ch_next = self.styler.safe_char_at(i + 1, b' ');
    }

    /// Enter `#{` at the cursor, unless nesting is already at its limit.
    fn enter_interpolation(&mut self) -> bool {
        if self.inner.len() >= INNER_STRINGS_MAX_COUNT {
            warn!(
                "ruby: interpolation nested deeper than {} at {}, left as string",
                INNER_STRINGS_MAX_COUNT, self.i
            );
            return false;
        }
        self.styler.colour_to(self.i - 1, self.state);
        self.styler.colour_to(self.i + 1, OPERATOR);
        self.inner.push(InnerExpression {
            state: self.state,
            brace_counts: self.brace_counts,
            quote: self.quote,
        });
        self.state = DEFAULT;
        self.brace_counts = 0;
        self.prefer_re = true;
        self.advance();
        true
    }

    /// `#@ivar`, `#@@cvar` or `#$global` inside a literal. The `#` is an
    /// operator and the variable takes its own style.
    fn interpolate_variable(&mut self) {
        self.styler.colour_to(self.i - 1, self.state);
        self.styler.colour_to(self.i, OPERATOR);
        let mut pos = self.i + 2;
        // bytes left in a special global; unbounded when negative
        let mut len = 0;
        let style = if self.ch_next == b'$' {
            if self.ch_next2 == b'-' {
                pos += 1;
                len = 2;
            } else if is_single_special_variable(self.ch_next2) {
                pos += 1;
                len = 1;
            }
            GLOBAL
        } else if self.ch_next2 == b'@' {
            pos += 1;
            CLASS_VAR
        } else {
            INSTANCE_VAR
        };
        loop {
            len -= 1;
            if len == 0 || !is_word_char_or_high(self.styler.safe_char_at(pos, b' ')) {
                break;
            }
            pos += 1;
        }
        self.styler.colour_to(pos - 1, style);
        self.skip_to(pos - 1);
    }

    fn exit_interpolation(&mut self) {
        if let Some(outer) = self.inner.pop() {
            self.state = outer.state;
            self.brace_counts = outer.brace_counts;
            self.quote = outer.quote;
        }
    }

    fn open_quote(&mut self, state: u8, up: u8) {
        self.styler.colour_to(self.i - 1, self.state);
        self.state = state;
        self.quote.reset();
        self.quote.open(up);
    }

    fn scan_default(&mut self) {
        let ch = self.ch;
        if is_digit(ch as u32) {
            self.styler.colour_to(self.i - 1, self.state);
            self.state = NUMBER;
            self.is_real_number = true;
            self.num_dots = 0;
        } else if is_high_bit(ch) || is_word_start(ch) {
            self.styler.colour_to(self.i - 1, self.state);
            self.state = WORD;
        } else if ch == b'#' {
            self.styler.colour_to(self.i - 1, self.state);
            self.state = COMMENTLINE;
        } else if ch == b'=' {
            let starts_pod = (self.i == 0 || is_eol(self.ch_prev))
                && self.ch_next == b'b'
                && self.styler.matches(self.i + 2, "egin")
                && !is_word_char_or_high(self.styler.safe_char_at(self.i + 6, b' '));
            self.styler.colour_to(self.i - 1, self.state);
            if starts_pod {
                self.state = POD;
            } else {
                self.styler.colour_to(self.i, OPERATOR);
                self.prefer_re = true;
            }
        } else if ch == b'"' {
            self.open_quote(STRING, ch);
        } else if ch == b'\'' {
            self.open_quote(CHARACTER, ch);
        } else if ch == b'`' {
            self.open_quote(BACKTICKS, ch);
        } else if ch == b'@' {
            self.styler.colour_to(self.i - 1, self.state);
            if self.ch_next == b'@' {
                self.state = CLASS_VAR;
                self.advance();
            } else {
                self.state = INSTANCE_VAR;
            }
        } else if ch == b'$' {
            self.styler.colour_to(self.i - 1, self.state);
            self.state = GLOBAL;
        } else if ch == b'/' && self.prefer_re {
            self.open_quote(REGEX, ch);
        } else if ch == b'<' && self.ch_next == b'<' && self.ch_next2 != b'=' {
            self.scan_shift_or_heredoc();
        } else if ch == b':' {
            self.scan_colon();
        } else if ch == b'%' {
            self.scan_percent();
        } else if ch == b'?' {
            self.styler.colour_to(self.i - 1, self.state);
            if is_space_or_tab(self.ch_next) || is_eol(self.ch_next) {
                self.styler.colour_to(self.i, OPERATOR);
            } else {
                // ?c character code, styled as a number
                self.state = NUMBER;
                self.is_real_number = false;
            }
        } else if is_operator(ch) || ch == b'.' {
            self.styler.colour_to(self.i - 1, self.state);
            self.styler.colour_to(self.i, OPERATOR);
            // After a closing bracket or a dot an operand has just ended, so
            // ambiguous characters are binary operators.
            if ch == b'{' {
                self.brace_counts += 1;
                self.prefer_re = true;
            } else if ch == b'}' {
                self.brace_counts -= 1;
                if self.brace_counts < 0 && !self.inner.is_empty() {
                    self.exit_interpolation();
                } else {
                    self.prefer_re = false;
                }
            } else {
                self.prefer_re = !b")}].".contains(&ch);
            }
        } else if is_eol(ch) {
            let line_end = ch == b'\r' || (ch == b'\n' && self.ch_prev != b'\r');
            if line_end && self.ch_prev != b'\\' {
                self.prefer_re = true;
            }
        }
    }

    /// `<<` with something after it other than `=`.
    fn scan_shift_or_heredoc(&mut self) {
        self.styler.colour_to(self.i - 1, self.state);
        self.i += 1;
        self.ch_next = self.ch_next2;
        self.styler.colour_to(self.i, OPERATOR);

        let target = self.ch_next2;
        if !(b"\"'`_-~".contains(&target) || is_safe_alpha(target)) {
            // cannot start a heredoc identifier
        } else if self.prefer_re {
            if sure_this_is_heredoc(self.i - 1, self.styler, &mut self.prev_word) {
                self.state = HERE_DELIM;
                self.here_doc.state = HereDocState::Opened;
            }
        } else if !sure_this_is_not_heredoc(self.i - 1, self.styler) {
            self.state = HERE_DELIM;
            self.here_doc.state = HereDocState::Opened;
        }
        self.prefer_re = self.state != HERE_DELIM;
    }

    /// `::`, symbols, or a ternary colon.
    fn scan_colon(&mut self) {
        self.styler.colour_to(self.i - 1, self.state);
        let (next, next2) = (self.ch_next, self.ch_next2);
        if next == b':' {
            self.styler.colour_to(self.i + 1, OPERATOR);
            self.advance();
            self.state = DEFAULT;
            self.prefer_re = false;
        } else if is_word_char_or_high(next) {
            self.state = SYMBOL;
        } else if (next == b'@' || next == b'$') && is_word_char_or_high(next2) {
            // :@ivar and :$global
            self.advance();
            self.state = SYMBOL;
        } else if ((next == b'@' && next2 == b'@') || (next == b'$' && next2 == b'-'))
            && is_word_char_or_high(self.styler.safe_char_at(self.i + 3, b' '))
        {
            // :@@cvar and :$-x
            self.state = SYMBOL;
            if next == b'$' {
                self.styler.colour_to(self.i + 3, SYMBOL);
                self.state = DEFAULT;
            }
            self.skip_to(self.i + 3);
        } else if next == b'$' && b"_~*$?!@/\\;,.=:<>\"&`'+".contains(&next2) {
            // single character special globals
            self.skip_to(self.i + 2);
            self.styler.colour_to(self.i, SYMBOL);
            self.state = DEFAULT;
        } else if b"[*!~+-/%=<>&^|".contains(&next) {
            self.scan_operator_symbol();
        } else if !self.prefer_re && !is_space_char(next as u32) {
            self.styler.colour_to(self.i, SYMBOL);
            self.state = DEFAULT;
        } else {
            self.styler.colour_to(self.i, OPERATOR);
            self.state = DEFAULT;
            self.prefer_re = true;
        }
    }

    /// Operator method names used as symbols: `:[]=`, `:**`, `:<=>`, ...
    fn scan_operator_symbol(&mut self) {
        let (next, next2) = (self.ch_next, self.ch_next2);
        let after = self.styler.safe_char_at(self.i + 3, b' ');
        match next {
            b'[' => {
                if next2 != b']' {
                    return;
                }
                if after == b'=' {
                    self.skip_to(self.i + 3);
                } else {
                    self.skip_to(self.i + 2);
                }
            }
            b'*' if next2 == b'*' => self.skip_to(self.i + 2),
            b'!' if next2 == b'=' || next2 == b'~' => self.skip_to(self.i + 2),
            b'<' if next2 == b'<' => self.skip_to(self.i + 2),
            b'<' if next2 == b'=' && after == b'>' => self.skip_to(self.i + 3),
            b'<' if next2 == b'=' => self.skip_to(self.i + 2),
            _ => self.advance(),
        }
        self.styler.colour_to(self.i, SYMBOL);
        self.state = DEFAULT;
    }

    /// `%q(...)` and friends, or the modulus operator.
    fn scan_percent(&mut self) {
        self.styler.colour_to(self.i - 1, self.state);
        let (next, next2) = (self.ch_next, self.ch_next2);
        let kind = match next {
            b'q' => Some(STRING_Q),
            b'Q' => Some(STRING_QQ),
            b'r' => Some(STRING_QR),
            b'w' => Some(STRING_QW),
            b'W' => Some(STRING_W),
            b'x' => Some(STRING_QX),
            b'i' => Some(STRING_I),
            b'I' => Some(STRING_QI),
            b's' => Some(STRING_QS),
            _ => None,
        };
        match kind {
            Some(kind) if !is_word_char_or_high(next2) => {
                self.quote.reset();
                self.state = kind;
                self.quote.open(next2);
                self.skip_to(self.i + 2);
            }
            _ if !is_word_char_or_high(next)
                && (self.prefer_re || (!is_space_or_tab(next) && !is_eol(next))) =>
            {
                self.quote.reset();
                self.state = STRING_QQ;
                self.quote.open(next);
                self.advance();
            }
            _ => {
                self.styler.colour_to(self.i, OPERATOR);
                self.prefer_re = true;
            }
        }
    }

    fn scan_word(&mut self) {
        let (ch, ch_prev, ch_next) = (self.ch, self.ch_prev, self.ch_next);
        if ch != b'.' && is_word_char_or_high(ch) {
            return;
        }
        let after_name = is_word_char_or_high(ch_prev);
        if ch == b'='
            && after_name
            && (ch_next == b'(' || b" \t\n\r".contains(&ch_next))
            && (self.prev_word == b"def" || {
                let word_start = self.styler.segment_start();
                follows_dot(word_start, self.styler)
            })
        {
            // `name=` being defined; the `=` belongs to the name
        } else if ch == b':' && after_name && b" \t\n\r".contains(&ch_next) {
            self.state = SYMBOL;
        } else if (ch == b'?' || ch == b'!') && after_name && !is_word_char_or_high(ch_next) {
            // `name?` and `name!` are names
        } else if is_eol(ch) && is_match(self.styler, self.length_doc, self.i - 7, b"__END__") {
            self.styler.colour_to(self.i, DATASECTION);
            self.state = DATASECTION;
            self.prefer_re = false;
        } else {
            let word_start = self.styler.segment_start();
            let word_style = self.classify_word(word_start, self.i - 1);
            self.prefer_re = match word_style {
                WORD => re_can_follow_keyword(&self.prev_word),
                WORD_DEMOTED => true,
                IDENTIFIER => {
                    is_match(self.styler, self.length_doc, word_start, b"print") || is_eol(ch)
                }
                _ => false,
            };
            if ch == b'.' {
                // maybe redefining an operator method
                self.prefer_re = false;
            }
            self.redo();
        }
    }

    /// Style the word `start..=end` and return its style.
    ///
    /// A word right after `class`, `module` or `def` names that thing.
    fn classify_word(&mut self, start: Position, end: Position) -> u8 {
        let limit = (end - start + 1).min(MAX_KEYWORD_LENGTH as Position - 1);
        let word = self.styler.range(start, start + limit);
        let style = match self.prev_word.as_slice() {
            b"class" => CLASSNAME,
            b"module" => MODULE_NAME,
            b"def" => DEFNAME,
            _ if self.keywords.in_list(&word)
                && (start == 0 || !follows_dot(start - 1, self.styler)) =>
            {
                if keyword_is_ambiguous(&word) && keyword_is_modifier(&word, start, self.styler) {
                    // `stmt if cond`: a keyword that opens no block
                    WORD_DEMOTED
                } else {
                    WORD
                }
            }
            _ => IDENTIFIER,
        };
        self.styler.colour_to(end, style);
        if style == WORD {
            self.prev_word = word;
        } else {
            self.prev_word.clear();
        }
        style
    }

    fn scan_number(&mut self) {
        let ch = self.ch;
        if !self.is_real_number {
            if ch != b'\\' {
                self.styler.colour_to(self.i, self.state);
                self.state = DEFAULT;
                self.prefer_re = false;
            } else if b"\\ntrfvaebs".contains(&self.ch_next) {
                // escape finishes on the next byte
            } else if self.ch_next == b'C' || self.ch_next == b'M' {
                if self.ch_next2 == b'-' {
                    // ?\C-x: continue from the x
                    self.i += 2;
                    self.ch = self.ch_next2;
                    self.ch_next = self.styler.safe_char_at(self.i + 1, b' ');
                }
            } else if self.ch_next == b'c' {
                self.advance();
            } else {
                self.styler.colour_to(self.i + 1, self.state);
                self.state = DEFAULT;
                self.prefer_re = false;
                self.advance();
            }
        } else if is_word_char_or_high(ch) {
            // digits, underscores, suffixes
        } else if ch == b'.' && self.ch_next == b'.' {
            // range operator
            self.num_dots += 1;
            self.styler.colour_to(self.i - 1, self.state);
            self.redo();
        } else if ch == b'.' && {
            self.num_dots += 1;
            self.num_dots == 1
        } {
            // decimal point
        } else {
            self.styler.colour_to(self.i - 1, self.state);
            self.redo();
            self.prefer_re = false;
        }
    }

    fn scan_here_delim(&mut self) {
        match self.here_doc.state {
            HereDocState::Opened => {
                self.here_doc.state = HereDocState::Delimiter;
                self.here_doc.delimiter.clear();
                self.here_doc.can_be_indented = self.ch == b'-' || self.ch == b'~';
                if self.here_doc.can_be_indented {
                    self.advance();
                }
                if is_eol(self.ch) {
                    // no target
                    self.state = DEFAULT;
                    self.prefer_re = false;
                } else {
                    self.here_doc.quote = self.ch;
                    self.here_doc.quoted = matches!(self.ch, b'\'' | b'"' | b'`');
                    if !self.here_doc.quoted {
                        self.here_doc.delimiter.push(self.ch);
                    }
                }
            }
            HereDocState::Delimiter => {
                if is_eol(self.ch) {
                    self.styler.colour_to(self.i - 1, self.state);
                    self.state = DEFAULT;
                    self.i -= 1;
                    self.ch_next = self.ch;
                    self.prefer_re = false;
                } else if self.here_doc.quoted {
                    if self.ch == self.here_doc.quote {
                        self.styler.colour_to(self.i, self.state);
                        self.state = DEFAULT;
                        self.prefer_re = false;
                    } else {
                        if self.ch == b'\\' && !is_eol(self.ch_next) {
                            self.advance();
                        }
                        self.here_doc.delimiter.push(self.ch);
                    }
                } else if is_word_char_or_high(self.ch) {
                    self.here_doc.delimiter.push(self.ch);
                } else {
                    self.styler.colour_to(self.i - 1, self.state);
                    self.redo();
                    self.prefer_re = false;
                }
                if self.here_doc.delimiter.len() >= MAX_DELIMITER {
                    warn!(
                        "ruby: heredoc delimiter longer than {} bytes at {}",
                        MAX_DELIMITER - 1,
                        self.i
                    );
                    self.styler.colour_to(self.i - 1, self.state);
                    self.state = ERROR;
                    self.prefer_re = false;
                }
            }
            HereDocState::Body => {}
        }
    }

    /// Heredoc body. Indentable terminators are recognised at their last
    /// byte, plain ones at the start of a line.
    fn scan_here_body(&mut self) {
        let delimiter_len = self.here_doc.delimiter.len() as Position;
        if self.ch == b'\\' && !is_eol(self.ch_next) {
            self.advance();
        } else if self.ch == b'#'
            && self.here_doc.interpolates()
            && matches!(self.ch_next, b'{' | b'@' | b'$')
        {
            if self.ch_next == b'{' {
                self.enter_interpolation();
            } else {
                self.interpolate_variable();
            }
        } else if !self.here_doc.can_be_indented {
            if is_eol(self.ch_prev)
                && is_match(self.styler, self.length_doc, self.i, &self.here_doc.delimiter)
            {
                self.styler.colour_to(self.i - 1, self.state);
                self.i += delimiter_len - 1;
                self.ch_next = self.styler.safe_char_at(self.i + 1, b' ');
                if is_eol(self.ch_next) {
                    self.styler.colour_to(self.i, HERE_DELIM);
                    self.state = DEFAULT;
                    self.here_doc.state = HereDocState::Opened;
                    self.prefer_re = false;
                }
            }
        } else if is_eol(self.ch_next)
            && looking_at_here_doc_delim(
                self.styler,
                self.i - delimiter_len + 1,
                self.length_doc,
                &self.here_doc.delimiter,
            )
        {
            self.styler.colour_to(self.i - delimiter_len, self.state);
            self.styler.colour_to(self.i, HERE_DELIM);
            self.state = DEFAULT;
            self.prefer_re = false;
            self.here_doc.state = HereDocState::Opened;
        }
    }

    fn scan_variable(&mut self) {
        let (ch, next, next2) = (self.ch, self.ch_next, self.ch_next2);
        let method_suffix = ((ch == b'!' || ch == b'?') && next != b'=')
            || (ch == b'=' && next != b'~' && next != b'>' && (next != b'=' || next2 == b'>'));
        if self.state == SYMBOL && method_suffix {
            self.styler.colour_to(self.i, self.state);
            self.state = DEFAULT;
            self.prefer_re = false;
        } else if !is_word_char_or_high(ch) {
            self.styler.colour_to(self.i - 1, self.state);
            self.redo();
            self.prefer_re = false;
        }
    }

    fn scan_global(&mut self) {
        if is_word_char_or_high(self.ch) {
            return;
        }
        if self.ch_prev == b'$' {
            // special globals: $0, $!, $-w
            if self.ch == b'-' {
                self.advance();
            }
            self.styler.colour_to(self.i, self.state);
            self.state = DEFAULT;
        } else {
            self.styler.colour_to(self.i - 1, self.state);
            self.redo();
        }
        self.prefer_re = false;
    }

    /// `=begin` blocks end at a line starting with `=end` and a blank.
    fn scan_pod(&mut self) {
        if b" \t\n\r".contains(&self.ch)
            && self.i > 5
            && is_eol(self.styler.char_at(self.i - 5))
            && is_match(self.styler, self.length_doc, self.i - 4, b"=end")
        {
            self.styler.colour_to(self.i - 1, self.state);
            self.state = DEFAULT;
            self.prefer_re = is_eol(self.ch);
        }
    }

    fn scan_regex(&mut self) {
        let ch = self.ch;
        if ch == b'\\' && self.quote.up != b'\\' {
            self.advance();
        } else if ch == self.quote.down {
            self.quote.count -= 1;
            if self.quote.count == 0 {
                // trailing options
                while is_safe_alpha(self.ch_next) {
                    self.i += 1;
                    self.ch = self.ch_next;
                    self.ch_next = self.styler.safe_char_at(self.i + 1, b' ');
                }
                self.styler.colour_to(self.i, self.state);
                self.state = DEFAULT;
                self.prefer_re = false;
            }
        } else if ch == self.quote.up {
            self.quote.count += 1;
        } else if ch == b'#' {
            match self.ch_next {
                b'{' => {
                    self.enter_interpolation();
                }
                b'@' | b'$' => self.interpolate_variable(),
                _ => self.scan_regex_comment(),
            }
        }
    }

    /// `#` inside a regex comments out the rest of the line, stopping early
    /// at the closing delimiter.
    fn scan_regex_comment(&mut self) {
        self.styler.colour_to(self.i - 1, self.state);
        let mut in_escape = false;
        loop {
            self.i += 1;
            if self.i >= self.length_doc {
                break;
            }
            self.ch = self.styler.safe_char_at(self.i, b' ');
            if self.ch == b'\\' {
                in_escape = true;
            } else if is_eol(self.ch) {
                self.styler.colour_to(self.i - 1, COMMENTLINE);
                break;
            } else if in_escape {
                in_escape = false;
            } else if self.ch == self.quote.down {
                // let the regex state see the delimiter and its options
                self.i -= 1;
                self.ch = self.styler.char_at(self.i);
                break;
            }
        }
        self.ch_next = self.styler.safe_char_at(self.i + 1, b' ');
    }

    fn scan_string(&mut self) {
        let ch = self.ch;
        if self.quote.down == 0 && !is_space_char(ch as u32) {
            self.quote.open(ch);
        } else if ch == b'\\' && self.quote.up != b'\\' {
            self.advance();
        } else if ch == self.quote.down {
            self.quote.count -= 1;
            if self.quote.count == 0 {
                self.styler.colour_to(self.i, self.state);
                self.state = DEFAULT;
                self.prefer_re = false;
            }
        } else if ch == self.quote.up {
            self.quote.count += 1;
        } else if ch == b'#' && interpolates(self.state) {
            match self.ch_next {
                b'{' => {
                    self.enter_interpolation();
                }
                b'@' | b'$' => self.interpolate_variable(),
                _ => {}
            }
        }
    }
}

/// Literals where `#{...}` and `#@var` are live.
fn interpolates(state: u8) -> bool {
    !matches!(state, STRING_Q | STRING_QW | STRING_I | STRING_QS | CHARACTER)
}

/// Globals named by a single punctuation byte, as in `$?`.
fn is_single_special_variable(ch: u8) -> bool {
    b"~*$?!@/\\;,.=:<>\"&`'+".contains(&ch)
}

/// Whether the position before `pos`, skipping blanks, is a `.` operator.
fn follows_dot(pos: Position, styler: &mut Accessor<'_>) -> bool {
    styler.flush();
    let mut pos = pos;
    while pos >= 1 {
        match actual_style(styler.style_at(pos)) {
            DEFAULT => {
                if !is_space_or_tab(styler.char_at(pos)) {
                    return false;
                }
            }
            OPERATOR => return styler.char_at(pos) == b'.',
            _ => return false,
        }
        pos -= 1;
    }
    false
}

/// Keywords after which a value is expected.
fn re_can_follow_keyword(keyword: &[u8]) -> bool {
    matches!(
        keyword,
        b"and"
            | b"begin"
            | b"break"
            | b"case"
            | b"do"
            | b"else"
            | b"elsif"
            | b"if"
            | b"next"
            | b"return"
            | b"when"
            | b"unless"
            | b"until"
            | b"not"
            | b"or"
    )
}

/// Keywords that are modifiers after a statement and openers before one.
fn keyword_is_ambiguous(word: &[u8]) -> bool {
    matches!(
        word,
        b"if" | b"do" | b"while" | b"unless" | b"until" | b"for"
    )
}

/// The word ending at `pos` in style `word_state`, including the byte at
/// `pos`.
fn get_prev_word(pos: Position, styler: &mut Accessor<'_>, word_state: u8) -> Vec<u8> {
    styler.flush();
    let mut start = pos - 1;
    while start > 0 {
        if actual_style(styler.style_at(start)) != word_state {
            start += 1;
            break;
        }
        start -= 1;
    }
    let start = start.max(pos - MAX_KEYWORD_LENGTH as Position).max(0);
    styler.range(start, pos + 1)
}

/// Whether the ambiguous keyword at `pos` modifies a preceding statement.
///
/// `do` is a modifier after `while`, `until` or `for` on the same line.
/// Others are modifiers when something other than an operator, a comment
/// or a definition precedes them, following backslash continuations.
fn keyword_is_modifier(word: &[u8], pos: Position, styler: &mut Accessor<'_>) -> bool {
    if word == b"do" {
        return keyword_do_starts_loop(pos, styler);
    }

    let mut line_start = styler.line_start(styler.line_of(pos));
    while line_start > 0 {
        let ch = styler.char_at(line_start - 1);
        if !is_eol(ch) {
            break;
        }
        let ch_prev = styler.safe_char_at(line_start - 2, b' ');
        let ch_prev2 = styler.safe_char_at(line_start - 3, b' ');
        let continued = ch_prev == b'\\' || (ch == b'\n' && ch_prev == b'\r' && ch_prev2 == b'\\');
        if !continued {
            break;
        }
        let line = styler.line_of(line_start - 1);
        line_start = styler.line_start(line);
    }

    styler.flush();
    let mut style = DEFAULT;
    let mut pos = pos - 1;
    while pos >= line_start {
        style = actual_style(styler.style_at(pos));
        if style != DEFAULT {
            break;
        }
        let ch = styler.char_at(pos);
        if is_eol(ch) {
            let ch_prev = styler.safe_char_at(pos - 1, b' ');
            let ch_prev2 = styler.safe_char_at(pos - 2, b' ');
            if ch_prev == b'\\' {
                pos -= 1;
            } else if ch == b'\n' && ch_prev == b'\r' && ch_prev2 == b'\\' {
                pos -= 2;
            } else {
                return false;
            }
        }
        pos -= 1;
    }
    if pos < line_start {
        return false;
    }

    match style {
        DEFAULT | COMMENTLINE | POD | CLASSNAME | DEFNAME | MODULE_NAME => false,
        // `a << if x then y else z end` assigns a block
        OPERATOR => matches!(styler.char_at(pos), b')' | b']' | b'}'),
        WORD if word == b"if" => get_prev_word(pos, styler, WORD) != b"else",
        _ => true,
    }
}

/// Whether a `while`, `until` or `for` precedes `pos` on its line.
fn keyword_do_starts_loop(pos: Position, styler: &mut Accessor<'_>) -> bool {
    let line_start = styler.line_start(styler.line_of(pos));
    styler.flush();
    let mut pos = pos - 1;
    while pos >= line_start {
        match actual_style(styler.style_at(pos)) {
            DEFAULT => {
                if is_eol(styler.char_at(pos)) {
                    return false;
                }
            }
            WORD => {
                let word = get_prev_word(pos, styler, WORD);
                if matches!(word.as_slice(), b"while" | b"until" | b"for") {
                    return true;
                }
            }
            _ => {}
        }
        pos -= 1;
    }
    false
}

/// Whether `line` holds only a comment.
fn is_comment_line(line: Line, styler: &mut Accessor<'_>) -> bool {
    let start = styler.line_start(line);
    let eol = styler.line_start(line + 1) - 1;
    for pos in start..eol {
        match styler.char_at(pos) {
            b'#' => return true,
            b' ' | b'\t' => {}
            _ => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, TextDocument};
    use crate::language::Lexer;

    fn lex(text: &str) -> TextDocument {
        let mut lexer = MODULE.create();
        lexer.word_list_set(0, DEFAULT_KEYWORDS);
        let mut doc = TextDocument::new(text);
        let len = doc.len();
        lexer.lex(0, len, DEFAULT, &mut doc);
        doc
    }

    fn style_of(doc: &TextDocument, text: &str, needle: &str) -> u8 {
        let at = text.find(needle).unwrap_or_else(|| panic!("{needle} not in {text}"));
        doc.styles()[at]
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let text = "if ready then go end\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, "if"), WORD);
        assert_eq!(style_of(&doc, text, "ready"), IDENTIFIER);
        assert_eq!(style_of(&doc, text, "end"), WORD);
        assert_eq!(doc.styles()[2], DEFAULT);
    }

    #[test]
    fn test_definition_names() {
        let text = "class Foo\nmodule Bar\ndef baz\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, "Foo"), CLASSNAME);
        assert_eq!(style_of(&doc, text, "Bar"), MODULE_NAME);
        assert_eq!(style_of(&doc, text, "baz"), DEFNAME);
    }

    #[test]
    fn test_modifier_if_is_demoted() {
        let text = "x = 1 if y\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, "if"), WORD_DEMOTED);
    }

    #[test]
    fn test_else_if_is_not_demoted() {
        let text = "else if y\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, "if"), WORD);
    }

    #[test]
    fn test_do_after_while_is_demoted() {
        let text = "while x do\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, "do"), WORD_DEMOTED);
    }

    #[test]
    fn test_keyword_after_dot_is_identifier() {
        let text = "obj.class\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, "class"), IDENTIFIER);
        assert_eq!(style_of(&doc, text, "."), OPERATOR);
    }

    #[test]
    fn test_numbers_and_ranges() {
        let text = "a = 1.5 + 1..3\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[4..7], &[NUMBER; 3]);
        assert_eq!(doc.styles()[10], NUMBER);
        assert_eq!(&doc.styles()[11..13], &[OPERATOR; 2]);
        assert_eq!(doc.styles()[13], NUMBER);
    }

    #[test]
    fn test_character_codes() {
        let text = "x = ?a + ?\\n\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[4..6], &[NUMBER; 2]);
        assert_eq!(&doc.styles()[9..12], &[NUMBER; 3]);
    }

    #[test]
    fn test_comment_and_pod() {
        let text = "# note\n=begin\ndocs\n=end\nx\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[0..6], &[COMMENTLINE; 6]);
        assert_eq!(style_of(&doc, text, "=begin"), POD);
        assert_eq!(style_of(&doc, text, "docs"), POD);
        assert_eq!(style_of(&doc, text, "=end"), POD);
        assert_eq!(doc.styles()[text.len() - 2], IDENTIFIER);
    }

    #[test]
    fn test_strings_and_interpolation() {
        let text = "s = \"a #{b} c\"\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[4..7], &[STRING; 3]);
        assert_eq!(&doc.styles()[7..9], &[OPERATOR; 2]);
        assert_eq!(doc.styles()[9], IDENTIFIER);
        assert_eq!(doc.styles()[10], OPERATOR);
        assert_eq!(&doc.styles()[11..14], &[STRING; 3]);
        assert_eq!(doc.styles()[14], DEFAULT);
    }

    #[test]
    fn test_single_quotes_do_not_interpolate() {
        let text = "s = 'a #{b}'\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[4..12], &[CHARACTER; 8]);
    }

    #[test]
    fn test_interpolation_depth_is_capped() {
        let text = "\"#{\"#{\"#{\"#{\"#{\"#{x}\"}\"}\"}\"}\"}\"\n";
        let doc = lex(text);
        // the sixth level stays inside the fifth string
        let innermost = text.find('x').unwrap_or(0);
        assert_eq!(doc.styles()[innermost], STRING);
        assert!(doc.styles().iter().all(|&s| s != ERROR));
    }

    #[test]
    fn test_percent_literals() {
        let text = "a = %w(x (y) z)\nb = %q[it]\nc = 10 % 3\n";
        let doc = lex(text);
        let start = text.find('%').unwrap_or(0);
        let end = text.find('\n').unwrap_or(0);
        assert!(doc.styles()[start..end].iter().all(|&s| s == STRING_QW));
        assert_eq!(style_of(&doc, text, "%q"), STRING_Q);
        assert_eq!(style_of(&doc, text, "% 3"), OPERATOR);
    }

    #[test]
    fn test_word_and_symbol_arrays() {
        let text = "a = %i(x #{y})\nb = %I(#{c})\nd = %s(sym)\ne = %W(#{f})\n";
        let doc = lex(text);
        let run = |from: &str, to: usize| {
            let at = text.find(from).unwrap_or(0);
            doc.styles()[at..at + to].to_vec()
        };
        assert_eq!(run("%i", 10), vec![STRING_I; 10]);
        assert_eq!(run("%s", 7), vec![STRING_QS; 7]);

        let open = text.find("%I").unwrap_or(0);
        assert_eq!(&doc.styles()[open..open + 3], &[STRING_QI; 3]);
        assert_eq!(&doc.styles()[open + 3..open + 5], &[OPERATOR; 2]);
        assert_eq!(doc.styles()[open + 5], IDENTIFIER);
        assert_eq!(doc.styles()[open + 6], OPERATOR);
        assert_eq!(doc.styles()[open + 7], STRING_QI);

        let open = text.find("%W").unwrap_or(0);
        assert_eq!(&doc.styles()[open..open + 3], &[STRING_W; 3]);
        assert_eq!(&doc.styles()[open + 3..open + 5], &[OPERATOR; 2]);
        assert_eq!(doc.styles()[open + 7], STRING_W);
    }

    #[test]
    fn test_variable_interpolation() {
        let text = "s = \"#@v #@@w #$x #$-y #$?\"\nr = /#@v/\n";
        let doc = lex(text);
        let styles = doc.styles();
        assert_eq!(styles[5], OPERATOR);
        assert_eq!(&styles[6..8], &[INSTANCE_VAR; 2]);
        assert_eq!(styles[8], STRING);
        assert_eq!(styles[9], OPERATOR);
        assert_eq!(&styles[10..13], &[CLASS_VAR; 3]);
        assert_eq!(styles[14], OPERATOR);
        assert_eq!(&styles[15..17], &[GLOBAL; 2]);
        assert_eq!(styles[18], OPERATOR);
        assert_eq!(&styles[19..22], &[GLOBAL; 3]);
        assert_eq!(styles[22], STRING);
        assert_eq!(styles[23], OPERATOR);
        assert_eq!(&styles[24..26], &[GLOBAL; 2]);
        assert_eq!(styles[26], STRING);
        assert_eq!(styles[27], DEFAULT);

        let regex = text.find('/').unwrap_or(0);
        assert_eq!(styles[regex], REGEX);
        assert_eq!(styles[regex + 1], OPERATOR);
        assert_eq!(&styles[regex + 2..regex + 4], &[INSTANCE_VAR; 2]);
        assert_eq!(styles[regex + 4], REGEX);
    }

    #[test]
    fn test_word_array_does_not_interpolate() {
        let text = "a = %w(#{x} #@y)\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[4..16], &[STRING_QW; 12]);
    }

    #[test]
    fn test_regex_versus_division() {
        let text = "x = a / b\ny = /ab+/i\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, "/ b"), OPERATOR);
        let regex = text.find("/ab").unwrap_or(0);
        assert_eq!(&doc.styles()[regex..regex + 6], &[REGEX; 6]);
        assert_eq!(doc.styles()[regex + 6], DEFAULT);
    }

    #[test]
    fn test_symbols_and_variables() {
        let text = "f(:name, :[]=, @a, @@b, $stdout, $!, A::B)\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, ":name"), SYMBOL);
        let op = text.find(":[]=").unwrap_or(0);
        assert_eq!(&doc.styles()[op..op + 4], &[SYMBOL; 4]);
        assert_eq!(style_of(&doc, text, "@a"), INSTANCE_VAR);
        assert_eq!(style_of(&doc, text, "@@b"), CLASS_VAR);
        assert_eq!(style_of(&doc, text, "$stdout"), GLOBAL);
        let bang = text.find("$!").unwrap_or(0);
        assert_eq!(&doc.styles()[bang..bang + 2], &[GLOBAL; 2]);
        assert_eq!(style_of(&doc, text, "::"), OPERATOR);
    }

    #[test]
    fn test_ternary_colon_is_operator() {
        let text = "v = x ? 1 : 2\n";
        let doc = lex(text);
        assert_eq!(style_of(&doc, text, "? 1"), OPERATOR);
        assert_eq!(style_of(&doc, text, ": 2"), OPERATOR);
        assert_eq!(style_of(&doc, text, "2"), NUMBER);
    }

    #[test]
    fn test_data_section() {
        let text = "x\n__END__\nanything \"goes\n";
        let doc = lex(text);
        let data = text.find("__END__").unwrap_or(0);
        assert!(doc.styles()[data..].iter().all(|&s| s == DATASECTION));
    }

    #[test]
    fn test_plain_heredoc() {
        let text = "puts <<EOS\nbody\nEOS\nx\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[7..10], &[HERE_DELIM; 3]);
        assert_eq!(style_of(&doc, text, "body"), HERE_Q);
        let close = text.rfind("EOS").unwrap_or(0);
        assert_eq!(&doc.styles()[close..close + 3], &[HERE_DELIM; 3]);
        assert_eq!(doc.styles()[close + 4], IDENTIFIER);
    }

    #[test]
    fn test_indented_heredoc_terminator() {
        let text = "x = <<~EOF\n  hello\n  EOF\ny\n";
        let doc = lex(text);
        let close = text.rfind("EOF").unwrap_or(0);
        assert_eq!(doc.styles()[close - 1], HERE_Q);
        assert_eq!(&doc.styles()[close..close + 3], &[HERE_DELIM; 3]);
        assert_eq!(doc.styles()[close + 3], DEFAULT);
    }

    #[test]
    fn test_heredoc_body_interpolation() {
        let text = "s = <<~EOS\n  #{name}\nEOS\n";
        let doc = lex(text);
        let styles = doc.styles();
        assert_eq!(&styles[11..13], &[HERE_Q; 2]);
        assert_eq!(&styles[13..15], &[OPERATOR; 2]);
        assert_eq!(&styles[15..19], &[IDENTIFIER; 4]);
        assert_eq!(styles[19], OPERATOR);
        assert_eq!(styles[20], HERE_Q);
        assert_eq!(&styles[21..24], &[HERE_DELIM; 3]);
    }

    #[test]
    fn test_heredoc_body_escape() {
        let text = "x = <<~EOS\n  \\#{a}\nEOS\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[11..19], &[HERE_Q; 8]);
        assert_eq!(&doc.styles()[19..22], &[HERE_DELIM; 3]);
    }

    #[test]
    fn test_quoted_heredoc_bodies() {
        let text = "x = <<~\"T\"\n  a #@v\nT\n";
        let doc = lex(text);
        let styles = doc.styles();
        assert_eq!(styles[13], HERE_QQ);
        assert_eq!(styles[15], OPERATOR);
        assert_eq!(&styles[16..18], &[INSTANCE_VAR; 2]);
        assert_eq!(styles[18], HERE_QQ);
        assert_eq!(styles[19], HERE_DELIM);

        let text = "x = <<~`CMD`\n  ls\nCMD\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[13..18], &[HERE_QX; 5]);
        assert_eq!(&doc.styles()[18..21], &[HERE_DELIM; 3]);

        let text = "x = <<~'T'\n  #{a}\nT\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[11..18], &[HERE_Q; 7]);
        assert_eq!(doc.styles()[18], HERE_DELIM);
    }

    #[test]
    fn test_shift_operator_is_not_heredoc() {
        let text = "list <<item\nputs list\n";
        let doc = lex(text);
        assert_eq!(&doc.styles()[5..7], &[OPERATOR; 2]);
        assert_eq!(doc.styles()[7], IDENTIFIER);
    }

    /// Relex a fully styled copy of `text` from the start of `line`.
    fn relex_from_line(text: &str, line: usize) -> (TextDocument, TextDocument) {
        let full = lex(text);
        let mut lexer = MODULE.create();
        lexer.word_list_set(0, DEFAULT_KEYWORDS);
        let mut doc = full.clone();
        let from = doc.line_start(line as Position);
        let len = doc.len();
        let init = doc.style_at(from - 1);
        lexer.lex(from, len - from, init, &mut doc);
        (full, doc)
    }

    #[test]
    fn test_line_after_comment_starts_expression() {
        let text = "x = y # note\n/ab/.match(z)\n";
        let (full, resumed) = relex_from_line(text, 1);
        assert_eq!(&full.styles()[13..17], &[REGEX; 4]);
        assert_eq!(resumed.styles(), full.styles());
    }

    #[test]
    fn test_line_after_pod_starts_expression() {
        let text = "=begin\ndocs\n=end\n/ab/.match(z)\n";
        let (full, resumed) = relex_from_line(text, 3);
        let regex = text.find("/ab/").unwrap_or(0);
        assert_eq!(&full.styles()[regex..regex + 4], &[REGEX; 4]);
        assert_eq!(resumed.styles(), full.styles());
    }

    #[test]
    fn test_relex_after_heredoc_interpolation() {
        let text = "s = <<~EOS\n  #{name}\nEOS\nx = 1\n";
        let (full, resumed) = relex_from_line(text, 2);
        assert_eq!(resumed.styles(), full.styles());
    }

    #[test]
    fn test_relex_from_middle_matches_full_lex() {
        let text = "def a\n  x = <<~T\n    one\n    two\n  T\n  y = \"s\"\nend\n";
        let full = lex(text);
        let mut lexer = MODULE.create();
        lexer.word_list_set(0, DEFAULT_KEYWORDS);
        let mut doc = full.clone();
        let from = text.find("two").unwrap_or(0) as Position;
        let len = doc.len();
        lexer.lex(from, len - from, HERE_Q, &mut doc);
        assert_eq!(doc.styles(), full.styles());
    }
}
