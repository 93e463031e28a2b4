//! LaTeX.
//!
//! Unlike Ruby this lexer keeps state between calls. The math mode in effect
//! at the end of each line goes into the document's line state, and the fold
//! pass keeps one [`FoldSave`] per line describing the open sectioning
//! commands and environments. A pass may therefore start at any line start.
//!
//! Nested constructs such as `$a\textrm{b $x$}c$` are not handled.

use log::debug;

use crate::accessor::Accessor;
use crate::charset::{is_eol, is_space_or_tab};
use crate::document::{
    Document, Line, Position, FOLD_LEVEL_BASE, FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_NUMBER_MASK,
};
use crate::language::{Lexer, LexerBase, LexerModule, LexicalClass};

pub const DEFAULT: u8 = 0;
pub const COMMAND: u8 = 1;
pub const TAG: u8 = 2;
pub const MATH: u8 = 3;
pub const COMMENT: u8 = 4;
pub const TAG2: u8 = 5;
pub const MATH2: u8 = 6;
pub const COMMENT2: u8 = 7;
pub const VERBATIM: u8 = 8;
pub const SHORTCMD: u8 = 9;
pub const SPECIAL: u8 = 10;
pub const CMDOPT: u8 = 11;
pub const ERROR: u8 = 12;

pub const STYLES: &[LexicalClass] = &[
    LexicalClass::new(DEFAULT, "SCE_L_DEFAULT", "default", "Text"),
    LexicalClass::new(COMMAND, "SCE_L_COMMAND", "keyword", "Command"),
    LexicalClass::new(TAG, "SCE_L_TAG", "identifier", "Environment name after \\begin"),
    LexicalClass::new(MATH, "SCE_L_MATH", "literal", "Inline math"),
    LexicalClass::new(COMMENT, "SCE_L_COMMENT", "comment", "Comment"),
    LexicalClass::new(TAG2, "SCE_L_TAG2", "identifier", "Environment name after \\end"),
    LexicalClass::new(MATH2, "SCE_L_MATH2", "literal", "Display math"),
    LexicalClass::new(COMMENT2, "SCE_L_COMMENT2", "comment", "Comment environment"),
    LexicalClass::new(VERBATIM, "SCE_L_VERBATIM", "literal", "Verbatim text"),
    LexicalClass::new(SHORTCMD, "SCE_L_SHORTCMD", "keyword", "Single character command"),
    LexicalClass::new(SPECIAL, "SCE_L_SPECIAL", "literal", "Escaped special character"),
    LexicalClass::new(CMDOPT, "SCE_L_CMDOPT", "literal", "Command options"),
    LexicalClass::new(ERROR, "SCE_L_ERROR", "error", "Syntax error"),
];

/// The LaTeX language.
pub const MODULE: LexerModule = LexerModule::with_factory(14, "latex", create, &[], STYLES);

fn create() -> Box<dyn Lexer> {
    Box::new(LatexLexer::new())
}

/// Environments lexed as display math.
const MATH_ENVIRONMENTS: &[&[u8]] = &[
    b"align",
    b"alignat",
    b"flalign",
    b"gather",
    b"multiline",
    b"displaymath",
    b"eqnarray",
    b"equation",
];

/// Sectioning commands, outermost first.
const STRUCTURE_WORDS: &[&[u8]] = &[
    b"part",
    b"chapter",
    b"section",
    b"subsection",
    b"subsubsection",
    b"paragraph",
    b"subparagraph",
];

/// Math mode, as stored in the line state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text = 0,
    Inline = 1,
    Display = 2,
}

impl Mode {
    fn from_line_state(state: i32) -> Self {
        match state {
            1 => Mode::Inline,
            2 => Mode::Display,
            _ => Mode::Text,
        }
    }

    /// Style to return to after a command or comment.
    fn base_style(self) -> u8 {
        match self {
            Mode::Text => DEFAULT,
            Mode::Inline => MATH,
            Mode::Display => MATH2,
        }
    }
}

/// Open sectioning levels and environments after a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldSave {
    /// Environments opened at each sectioning depth.
    open_begins: [i32; 8],
    /// Depth after the innermost sectioning command seen.
    struct_lev: usize,
}

impl FoldSave {
    fn level(&self) -> i32 {
        let open: i32 = self.open_begins[..=self.struct_lev].iter().sum();
        (open + self.struct_lev as i32 + FOLD_LEVEL_BASE) & FOLD_LEVEL_NUMBER_MASK
    }
}

/// The LaTeX lexer.
#[derive(Debug, Default)]
pub struct LatexLexer {
    base: LexerBase,
    saves: Vec<FoldSave>,
}

impl LatexLexer {
    pub fn new() -> Self {
        Self {
            base: LexerBase::new(),
            saves: Vec::new(),
        }
    }
}

fn is_special(ch: u8) -> bool {
    matches!(ch, b'#' | b'$' | b'%' | b'&' | b'_' | b'{' | b'}' | b' ')
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic()
}

/// Skip blanks from `i` to a `{name}` and leave `i` on its `}`.
///
/// Names hold letters and `*`. On failure `i` is left on the offending byte.
fn tag_is_valid(i: &mut Position, end: Position, styler: &mut Accessor<'_>) -> bool {
    while *i < end {
        let ch = styler.safe_char_at(*i, b' ');
        if ch == b'{' {
            while *i < end {
                *i += 1;
                let ch = styler.safe_char_at(*i, b' ');
                if ch == b'}' {
                    return true;
                } else if !is_letter(ch) && ch != b'*' {
                    return false;
                }
            }
        } else if !is_space_or_tab(ch) {
            return false;
        }
        *i += 1;
    }
    false
}

/// Whether the first byte from `i` that is not blank, a line end or `*` is
/// `needle`.
fn next_not_blank_is(i: Position, styler: &mut Accessor<'_>, needle: u8) -> bool {
    let len = styler.len();
    (i..len)
        .map(|pos| styler.safe_char_at(pos, b' '))
        .find(|&ch| !matches!(ch, b' ' | b'\t' | b'\r' | b'\n' | b'*'))
        == Some(needle)
}

/// Whether the text ending at `end` (inclusive) is `needle`.
fn last_word_is(end: Position, styler: &mut Accessor<'_>, needle: &[u8]) -> bool {
    let start = end - needle.len() as Position + 1;
    needle
        .iter()
        .enumerate()
        .all(|(k, &ch)| styler.safe_char_at(start + k as Position, b' ') == ch)
}

/// Whether the `{name}` ending at `pos` names a math environment.
fn last_word_is_math_env(pos: Position, styler: &mut Accessor<'_>) -> bool {
    if styler.safe_char_at(pos, b' ') != b'}' {
        return false;
    }
    let mut open = pos - 1;
    while open >= 0 {
        if styler.safe_char_at(open, b' ') == b'{' {
            break;
        }
        if pos - open >= 20 {
            return false;
        }
        open -= 1;
    }
    if open < 0 || open == pos - 1 {
        return false;
    }
    let mut name = styler.range(open + 1, pos);
    if name.last() == Some(&b'*') {
        name.pop();
    }
    MATH_ENVIRONMENTS.contains(&name.as_slice())
}

/// Position of the `}` closing an `\end{name}` that starts at `i`.
fn end_tag_at(i: Position, end: Position, styler: &mut Accessor<'_>) -> Option<Position> {
    if !last_word_is(i + 3, styler, b"\\end") {
        return None;
    }
    let mut tag_end = i + 4;
    tag_is_valid(&mut tag_end, end, styler).then_some(tag_end)
}

fn colourise(start: Position, length: Position, init_style: u8, styler: &mut Accessor<'_>) {
    styler.start_at(start);
    let mut mode = Mode::from_line_state(styler.line_state(styler.line_of(start) - 1));
    let mut state = init_style;
    if matches!(state, ERROR | SHORTCMD | SPECIAL) {
        state = mode.base_style();
    }

    let mut ch_next = styler.safe_char_at(start, b' ');
    let mut verbatim_delim: Option<u8> = None;
    styler.start_segment(start);
    let end = start + length;

    let mut i = start;
    while i < end {
        let mut ch = ch_next;
        ch_next = styler.safe_char_at(i + 1, b' ');

        if styler.is_lead_byte(ch) {
            i += 2;
            ch_next = styler.safe_char_at(i, b' ');
            continue;
        }

        if is_eol(ch) {
            let line = styler.line_of(i);
            styler.set_line_state(line, mode as i32);
        }

        match state {
            DEFAULT => match ch {
                b'\\' => {
                    styler.colour_to(i - 1, state);
                    if is_letter(ch_next) {
                        state = COMMAND;
                    } else if is_special(ch_next) {
                        styler.colour_to(i + 1, SPECIAL);
                        i += 1;
                        ch_next = styler.safe_char_at(i + 1, b' ');
                    } else if is_eol(ch_next) {
                        styler.colour_to(i, ERROR);
                    } else if ch_next.is_ascii() {
                        styler.colour_to(i + 1, SHORTCMD);
                        if ch_next == b'(' {
                            mode = Mode::Inline;
                            state = MATH;
                        } else if ch_next == b'[' {
                            mode = Mode::Display;
                            state = MATH2;
                        }
                        i += 1;
                        ch_next = styler.safe_char_at(i + 1, b' ');
                    }
                }
                b'$' => {
                    styler.colour_to(i - 1, state);
                    if ch_next == b'$' {
                        styler.colour_to(i + 1, SHORTCMD);
                        mode = Mode::Display;
                        state = MATH2;
                        i += 1;
                        ch_next = styler.safe_char_at(i + 1, b' ');
                    } else {
                        styler.colour_to(i, SHORTCMD);
                        mode = Mode::Inline;
                        state = MATH;
                    }
                }
                b'%' => {
                    styler.colour_to(i - 1, state);
                    state = COMMENT;
                }
                _ => {}
            },
            COMMAND => {
                if !is_letter(ch_next) {
                    styler.colour_to(i, state);
                    if next_not_blank_is(i + 1, styler, b'[') {
                        state = CMDOPT;
                    } else if last_word_is(i, styler, b"\\begin") {
                        state = TAG;
                    } else if last_word_is(i, styler, b"\\end") {
                        state = TAG2;
                    } else if last_word_is(i, styler, b"\\verb") && ch_next != b'*' && ch_next != b' '
                    {
                        verbatim_delim = Some(ch_next);
                        state = VERBATIM;
                    } else {
                        state = mode.base_style();
                    }
                }
            }
            CMDOPT => {
                if ch == b']' {
                    styler.colour_to(i, state);
                    state = mode.base_style();
                }
            }
            TAG | TAG2 => {
                let opening = state == TAG;
                if tag_is_valid(&mut i, end, styler) {
                    styler.colour_to(i, state);
                    state = mode.base_style();
                    if opening {
                        if last_word_is(i, styler, b"{verbatim}")
                            || last_word_is(i, styler, b"{lstlisting}")
                        {
                            state = VERBATIM;
                        } else if last_word_is(i, styler, b"{comment}") {
                            state = COMMENT2;
                        } else if last_word_is(i, styler, b"{math}") && mode == Mode::Text {
                            mode = Mode::Inline;
                            state = MATH;
                        } else if last_word_is_math_env(i, styler) && mode == Mode::Text {
                            mode = Mode::Display;
                            state = MATH2;
                        }
                    }
                } else {
                    styler.colour_to(i, ERROR);
                    state = mode.base_style();
                    ch = styler.safe_char_at(i, b' ');
                    if is_eol(ch) {
                        let line = styler.line_of(i);
                        styler.set_line_state(line, mode as i32);
                    }
                }
                ch_next = styler.safe_char_at(i + 1, b' ');
            }
            MATH | MATH2 => {
                let display = state == MATH2;
                match ch {
                    b'\\' => {
                        styler.colour_to(i - 1, state);
                        if is_letter(ch_next) {
                            if let Some(tag_end) = end_tag_at(i, end, styler) {
                                let closes = if display {
                                    last_word_is_math_env(tag_end, styler)
                                } else {
                                    last_word_is(tag_end, styler, b"{math}")
                                };
                                if closes {
                                    mode = Mode::Text;
                                }
                            }
                            state = COMMAND;
                        } else if is_special(ch_next) {
                            styler.colour_to(i + 1, SPECIAL);
                            i += 1;
                            ch_next = styler.safe_char_at(i + 1, b' ');
                        } else if is_eol(ch_next) {
                            styler.colour_to(i, ERROR);
                        } else if ch_next.is_ascii() {
                            let closer = if display { b']' } else { b')' };
                            if ch_next == closer {
                                mode = Mode::Text;
                                state = DEFAULT;
                            }
                            styler.colour_to(i + 1, SHORTCMD);
                            i += 1;
                            ch_next = styler.safe_char_at(i + 1, b' ');
                        }
                    }
                    b'$' => {
                        styler.colour_to(i - 1, state);
                        if !display {
                            styler.colour_to(i, SHORTCMD);
                            mode = Mode::Text;
                            state = DEFAULT;
                        } else if ch_next == b'$' {
                            styler.colour_to(i + 1, SHORTCMD);
                            i += 1;
                            ch_next = styler.safe_char_at(i + 1, b' ');
                            mode = Mode::Text;
                            state = DEFAULT;
                        } else {
                            // inline math inside a display, e.g. in \text{}
                            styler.colour_to(i, SHORTCMD);
                        }
                    }
                    b'%' => {
                        styler.colour_to(i - 1, state);
                        state = COMMENT;
                    }
                    _ => {}
                }
            }
            COMMENT => {
                if is_eol(ch) {
                    styler.colour_to(i - 1, state);
                    state = mode.base_style();
                }
            }
            COMMENT2 => {
                let closes = ch == b'\\'
                    && end_tag_at(i, end, styler)
                        .is_some_and(|tag_end| last_word_is(tag_end, styler, b"{comment}"));
                if closes {
                    styler.colour_to(i - 1, state);
                    state = COMMAND;
                }
            }
            VERBATIM => {
                if ch == b'\\' {
                    let closes = end_tag_at(i, end, styler).is_some_and(|tag_end| {
                        last_word_is(tag_end, styler, b"{verbatim}")
                            || last_word_is(tag_end, styler, b"{lstlisting}")
                    });
                    if closes {
                        styler.colour_to(i - 1, state);
                        state = COMMAND;
                    }
                } else if verbatim_delim.is_some_and(|delim| ch_next == delim) {
                    styler.colour_to(i + 1, state);
                    state = mode.base_style();
                    verbatim_delim = None;
                    i += 1;
                    ch_next = styler.safe_char_at(i + 1, b' ');
                } else if verbatim_delim.is_some() && is_eol(ch) {
                    styler.colour_to(i, ERROR);
                    state = mode.base_style();
                    verbatim_delim = None;
                }
            }
            // only ever written for single characters
            _ => {}
        }
        i += 1;
    }
    styler.colour_to(end - 1, state);
    styler.flush();
}

/// Sectioning depth of a command name.
fn structure_depth(word: &[u8]) -> Option<usize> {
    STRUCTURE_WORDS.iter().position(|w| *w == word)
}

fn fold_lines(
    saves: &mut Vec<FoldSave>,
    start: Position,
    end: Position,
    styler: &mut Accessor<'_>,
) {
    let mut line = styler.line_of(start);
    let mut save = line_save(saves, line - 1);
    let mut start = start;
    loop {
        let mut level = None;
        let mut needs_fold = false;
        let mut i = start;
        while i < end {
            let ch = styler.safe_char_at(i, b' ');
            if is_eol(ch) {
                break;
            }
            if ch != b'\\' || styler.style_at(i) != COMMAND {
                i += 1;
                continue;
            }
            let mut word = Vec::with_capacity(15);
            while word.len() < 15 && i + 1 < end {
                let ch = styler.safe_char_at(i + 1, b' ');
                if !is_letter(ch) {
                    break;
                }
                word.push(ch);
                i += 1;
            }
            match word.as_slice() {
                b"begin" => {
                    level = level.or(Some(save.level()));
                    save.open_begins[save.struct_lev] += 1;
                    needs_fold = true;
                }
                b"end" => {
                    while save.struct_lev > 0 && save.open_begins[save.struct_lev] == 0 {
                        save.struct_lev -= 1;
                    }
                    level = level.or(Some(save.level()));
                    if save.open_begins[save.struct_lev] > 0 {
                        save.open_begins[save.struct_lev] -= 1;
                    }
                }
                other => {
                    if let Some(depth) = structure_depth(other) {
                        // environments left open in deeper sections move up
                        save.struct_lev = depth;
                        let inner: i32 = save.open_begins[depth + 1..].iter().sum();
                        save.open_begins[depth] += inner;
                        save.open_begins[depth + 1..].fill(0);
                        level = level.or(Some(save.level()));
                        save.struct_lev += 1;
                        needs_fold = true;
                    }
                }
            }
            i += 1;
        }

        let mut level = level.unwrap_or_else(|| save.level());
        if needs_fold {
            level |= FOLD_LEVEL_HEADER_FLAG;
        }
        styler.set_level(line, level);
        set_line_save(saves, line, save);
        line += 1;
        start = styler.line_start(line);
        if start == styler.len() {
            styler.set_level(line, save.level());
            set_line_save(saves, line, save);
            saves.truncate(line as usize + 1);
        }
        if start >= end {
            break;
        }
    }
}

fn line_save(saves: &[FoldSave], line: Line) -> FoldSave {
    usize::try_from(line)
        .ok()
        .and_then(|line| saves.get(line).copied())
        .unwrap_or_default()
}

fn set_line_save(saves: &mut Vec<FoldSave>, line: Line, save: FoldSave) {
    let Ok(line) = usize::try_from(line) else {
        return;
    };
    if line >= saves.len() {
        saves.resize(line + 1, FoldSave::default());
    }
    saves[line] = save;
}

impl Lexer for LatexLexer {
    fn name(&self) -> &str {
        MODULE.name()
    }

    fn identifier(&self) -> i32 {
        MODULE.language()
    }

    fn property_names(&self) -> &[&'static str] {
        &["fold"]
    }

    fn property_set(&mut self, key: &str, value: &str) -> Option<Position> {
        self.base.property_set(key, value)
    }

    fn property_get(&self, key: &str) -> String {
        self.base.property_get(key)
    }

    fn describe_word_list_sets(&self) -> &[&'static str] {
        &[]
    }

    fn word_list_set(&mut self, _n: usize, _words: &str) -> Option<Position> {
        None
    }

    fn named_styles(&self) -> &[LexicalClass] {
        STYLES
    }

    fn lex(&mut self, start: Position, length: Position, init_style: u8, doc: &mut dyn Document) {
        // always begin at a line start
        let line_start = doc.line_start(doc.line_from_position(start));
        let (start, length, init_style) = if line_start < start {
            let style = if line_start > 0 { doc.style_at(line_start - 1) } else { DEFAULT };
            (line_start, length + start - line_start, style)
        } else {
            (start, length, init_style)
        };
        debug!("latex: lex {}..{} from style {}", start, start + length, init_style);
        if length <= 0 {
            return;
        }
        let mut styler = Accessor::new(doc, &self.base.props);
        colourise(start, length, init_style, &mut styler);
    }

    fn fold(&mut self, start: Position, length: Position, _init_style: u8, doc: &mut dyn Document) {
        if self.base.props.get_int("fold", 1) == 0 {
            return;
        }
        let end = start + length;
        let mut line = doc.line_from_position(start);
        if line > 0 && (line - 1) as usize >= self.saves.len() {
            debug!("latex: no fold state before line {}, folding from the top", line);
            line = 0;
        }
        let start = doc.line_start(line);
        debug!("latex: fold {}..{}", start, end);
        let mut styler = Accessor::new(doc, &self.base.props);
        fold_lines(&mut self.saves, start, end, &mut styler);
    }
}
