//! Ruby folding.
//!
//! Works from the committed styles, so the text must be lexed first. Block
//! keywords, brackets and heredocs open and close fold levels; `if` and
//! friends only count when the lexer left them as [`WORD`] rather than
//! demoting them to modifiers.
//!
//! A closing line (`end`, `}`) sits at the outer level. Each line also keeps
//! the level in effect after it in bits 16 and up, which is where a later
//! pass resumes.

use super::style::*;
use super::{get_prev_word, is_comment_line, synchronize_doc_start};
use crate::accessor::Accessor;
use crate::charset::{is_eol, is_space_char, is_space_or_tab};
use crate::document::{
    Position, FOLD_LEVEL_BASE, FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_NUMBER_MASK,
    FOLD_LEVEL_WHITE_FLAG,
};
use crate::wordlist::WordList;

/// Bits holding the level after the line.
const RESUME_SHIFT: i32 = 16;

/// Progress through a `def` that may turn out endless (`def name = expr`),
/// which must not open a fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MethodDefinition {
    None,
    Define,
    Operator,
    Name,
    Argument,
}

fn opens_block(word: &[u8]) -> bool {
    matches!(
        word,
        b"if" | b"class" | b"module" | b"begin" | b"case" | b"do" | b"while" | b"unless"
            | b"until" | b"for"
    )
}

/// Level stored for a line that started at `prev` and ended at `current`.
fn line_level(prev: i32, current: i32, visible_chars: usize, fold_compact: bool) -> i32 {
    let mut level = prev.min(current).max(0) + FOLD_LEVEL_BASE;
    if visible_chars == 0 && fold_compact {
        level |= FOLD_LEVEL_WHITE_FLAG;
    }
    if current > prev && visible_chars > 0 {
        level |= FOLD_LEVEL_HEADER_FLAG;
    }
    level | ((current.max(0) + FOLD_LEVEL_BASE) << RESUME_SHIFT)
}

/// Level in effect at the start of the line after one stored as `level`.
fn resume_level(level: i32) -> i32 {
    (((level >> RESUME_SHIFT) & FOLD_LEVEL_NUMBER_MASK) - FOLD_LEVEL_BASE).max(0)
}

/// Fold `[start, start + length)`.
pub fn fold(
    start: Position,
    length: Position,
    init_style: u8,
    _word_lists: &[WordList],
    styler: &mut Accessor<'_>,
) {
    let fold_compact = styler.property_int("fold.compact", 1) != 0;
    let fold_comment = styler.property_int("fold.comment", 0) != 0;

    let (start, length, _) = synchronize_doc_start(start, length, init_style, styler);
    let end = start + length;
    let mut line = styler.line_of(start);
    let mut level_prev = if start == 0 {
        0
    } else {
        resume_level(styler.level_at(line - 1))
    };
    let mut level_current = level_prev;
    let mut visible_chars = 0;
    let mut ch_prev = 0u8;
    let mut ch_next = styler.char_at(start);
    let mut style_next = actual_style(styler.style_at(start));
    let mut style_prev = if start <= 1 {
        DEFAULT
    } else {
        actual_style(styler.style_at(start - 1))
    };
    let mut method_definition = MethodDefinition::None;
    let mut paren_count = 0;
    let mut heredoc_open = false;
    let mut ends_with_eol = false;

    for i in start..end {
        let ch = ch_next;
        ch_next = styler.safe_char_at(i + 1, b' ');
        let style = style_next;
        style_next = actual_style(styler.style_at(i + 1));
        let at_eol = (ch == b'\r' && ch_next != b'\n') || ch == b'\n';

        if fold_comment && at_eol && is_comment_line(line, styler) {
            let prev_comment = is_comment_line(line - 1, styler);
            let next_comment = is_comment_line(line + 1, styler);
            if !prev_comment && next_comment {
                level_current += 1;
            } else if prev_comment && !next_comment {
                level_current -= 1;
            }
        }

        match style {
            COMMENTLINE => {
                // `#{` and `#}` mark explicit regions
                if fold_comment && style_prev != COMMENTLINE {
                    if ch_next == b'{' {
                        level_current += 1;
                    } else if ch_next == b'}' && level_current > 0 {
                        level_current -= 1;
                    }
                }
            }
            OPERATOR => {
                if b"[{(".contains(&ch) {
                    level_current += 1;
                } else if b")}]".contains(&ch) && level_current > 0 {
                    level_current -= 1;
                }
            }
            WORD if style_next != WORD => {
                let word = get_prev_word(i, styler, WORD);
                if word == b"end" {
                    if level_current > 0 {
                        level_current -= 1;
                    }
                } else if word == b"def" {
                    level_current += 1;
                    method_definition = MethodDefinition::Define;
                } else if opens_block(&word) {
                    level_current += 1;
                }
            }
            HERE_DELIM if !heredoc_open => {
                if style_prev == OPERATOR
                    && ch_prev == b'<'
                    && styler.safe_char_at(i - 2, b' ') == b'<'
                {
                    level_current += 1;
                    heredoc_open = true;
                } else if style_next != HERE_DELIM {
                    level_current -= 1;
                }
            }
            STRING_QW | STRING_W => {
                if style_prev != style {
                    level_current += 1;
                }
                if style_next != style {
                    level_current -= 1;
                }
            }
            _ => {}
        }

        if method_definition == MethodDefinition::Define {
            if style == OPERATOR {
                method_definition = MethodDefinition::Operator;
            } else if matches!(style, DEFNAME | WORD_DEMOTED | CLASSNAME | IDENTIFIER) {
                method_definition = MethodDefinition::Name;
            } else if !(style == WORD || is_space_or_tab(ch)) {
                method_definition = MethodDefinition::None;
            }
        }
        match method_definition {
            MethodDefinition::Operator | MethodDefinition::Name => {
                if is_eol(ch_next) || ch_next == b'#' {
                    method_definition = MethodDefinition::None;
                } else if ch_next == b'(' || ch_next <= b' ' {
                    // setters cannot be endless
                    if ch == b'='
                        && (method_definition == MethodDefinition::Name || ch_prev == b']')
                    {
                        method_definition = MethodDefinition::None;
                    } else {
                        method_definition = MethodDefinition::Argument;
                        paren_count = 0;
                    }
                }
            }
            MethodDefinition::Argument if style == OPERATOR => {
                if ch == b'(' {
                    paren_count += 1;
                } else if ch == b')' {
                    paren_count -= 1;
                } else if paren_count == 0 {
                    method_definition = MethodDefinition::None;
                    if ch == b'=' && level_current > 0 {
                        level_current -= 1;
                    }
                }
            }
            MethodDefinition::Argument if paren_count == 0 && !is_space_or_tab(ch) => {
                method_definition = MethodDefinition::None;
            }
            _ => {}
        }

        if at_eol {
            styler.set_level(
                line,
                line_level(level_prev, level_current, visible_chars, fold_compact),
            );
            line += 1;
            level_prev = level_current;
            visible_chars = 0;
            method_definition = MethodDefinition::None;
            paren_count = 0;
            heredoc_open = false;
            ends_with_eol = true;
        } else if !is_space_char(ch as u32) {
            visible_chars += 1;
            ends_with_eol = false;
        }
        ch_prev = ch;
        style_prev = style;
    }

    if ends_with_eol || length == 0 {
        // the line after the range starts where this one ended
        let level = level_current.max(0) + FOLD_LEVEL_BASE;
        styler.set_level(line, level | (level << RESUME_SHIFT));
    } else {
        styler.set_level(
            line,
            line_level(level_prev, level_current, visible_chars, fold_compact),
        );
    }
}
