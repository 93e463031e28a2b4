//! Properties and INI files.
//!
//! Every line is independent: a comment, a `[section]` header, a `@` default
//! value line, or `key = value` / `key: value`. A lex pass can start at any
//! line start with no other context.

use crate::accessor::Accessor;
use crate::charset::is_space_char;
use crate::context::StyleContext;
use crate::document::{
    Line, Position, FOLD_LEVEL_BASE, FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_NUMBER_MASK,
    FOLD_LEVEL_WHITE_FLAG,
};
use crate::language::{LexerModule, LexicalClass};
use crate::wordlist::WordList;

pub const DEFAULT: u8 = 0;
pub const COMMENT: u8 = 1;
pub const SECTION: u8 = 2;
pub const ASSIGNMENT: u8 = 3;
pub const DEFVAL: u8 = 4;
pub const KEY: u8 = 5;

pub const STYLES: &[LexicalClass] = &[
    LexicalClass::new(DEFAULT, "SCE_PROPS_DEFAULT", "default", "Default"),
    LexicalClass::new(COMMENT, "SCE_PROPS_COMMENT", "comment", "Comment"),
    LexicalClass::new(SECTION, "SCE_PROPS_SECTION", "preprocessor", "Section"),
    LexicalClass::new(ASSIGNMENT, "SCE_PROPS_ASSIGNMENT", "operator", "Assignment operator"),
    LexicalClass::new(DEFVAL, "SCE_PROPS_DEFVAL", "literal", "Default value (@)"),
    LexicalClass::new(KEY, "SCE_PROPS_KEY", "identifier", "Key"),
];

/// Set to 0 to style indented lines in the default style, for formats
/// such as RFC 2822 headers where indentation continues the previous line.
pub const ALLOW_INITIAL_SPACES: &str = "lexer.props.allow.initial.spaces";

/// The properties language.
pub const MODULE: LexerModule = LexerModule::new(9, "props", colourise, Some(fold), &[], STYLES);

fn is_assign_char(ch: u32) -> bool {
    ch == '=' as u32 || ch == ':' as u32
}

/// Whether the rest of the current line holds `=` or `:`.
fn line_has_assignment(sc: &mut StyleContext<'_, '_>) -> bool {
    let from = sc.current_pos;
    let line = sc.current_line;
    let styler = sc.styler();
    let end = styler.line_end(line);
    (from..end).any(|pos| matches!(styler.char_at(pos), b'=' | b':'))
}

/// Style `[start, start + length)`.
pub fn colourise(
    start: Position,
    length: Position,
    _init_style: u8,
    _word_lists: &[WordList],
    styler: &mut Accessor<'_>,
) {
    let allow_initial_spaces = styler.property_int(ALLOW_INITIAL_SPACES, 1) != 0;

    let line_start = styler.line_start(styler.line_of(start));
    let length = length + (start - line_start);
    let mut sc = StyleContext::new(line_start, length, DEFAULT, styler);

    // still before the first visible character of the line
    let mut seeking = true;
    while sc.more() {
        if sc.at_line_start {
            sc.set_state(DEFAULT);
            seeking = allow_initial_spaces || !is_space_char(sc.ch);
        }

        if seeking && !is_space_char(sc.ch) {
            seeking = false;
            match char::from_u32(sc.ch) {
                Some('#' | '!' | ';') => sc.set_state(COMMENT),
                Some('[') => sc.set_state(SECTION),
                Some('@') => {
                    sc.set_state(DEFVAL);
                    sc.forward();
                    if is_assign_char(sc.ch) {
                        sc.set_state(ASSIGNMENT);
                        sc.forward();
                    }
                    sc.set_state(DEFAULT);
                    continue;
                }
                _ => {
                    if line_has_assignment(&mut sc) {
                        sc.set_state(KEY);
                    }
                }
            }
        }

        if sc.state == KEY && is_assign_char(sc.ch) {
            sc.set_state(ASSIGNMENT);
            sc.forward_set_state(DEFAULT);
            continue;
        }
        sc.forward();
    }
    sc.complete();
}

/// Level of a line that is not a section header.
fn body_level(line: Line, styler: &Accessor<'_>) -> i32 {
    if line == 0 {
        return FOLD_LEVEL_BASE;
    }
    let prev = styler.level_at(line - 1);
    if prev & FOLD_LEVEL_HEADER_FLAG != 0 {
        FOLD_LEVEL_BASE + 1
    } else {
        prev & FOLD_LEVEL_NUMBER_MASK
    }
}

fn line_level(line: Line, header: bool, visible_chars: usize, fold_compact: bool, styler: &Accessor<'_>) -> i32 {
    let mut level = if header {
        FOLD_LEVEL_BASE | FOLD_LEVEL_HEADER_FLAG
    } else {
        body_level(line, styler)
    };
    if visible_chars == 0 && fold_compact {
        level |= FOLD_LEVEL_WHITE_FLAG;
    }
    level
}

/// Fold sections: a header line at the base level, its body one deeper.
pub fn fold(
    start: Position,
    length: Position,
    _init_style: u8,
    _word_lists: &[WordList],
    styler: &mut Accessor<'_>,
) {
    let fold_compact = styler.property_int("fold.compact", 1) != 0;

    let end = start + length;
    let mut line = styler.line_of(start);
    let mut ch_next = styler.safe_char_at(start, b' ');
    let mut style_next = styler.style_at(start);
    let mut header = false;
    let mut visible_chars = 0;

    for i in start..end {
        let ch = ch_next;
        ch_next = styler.safe_char_at(i + 1, b' ');
        let style = style_next;
        style_next = styler.style_at(i + 1);
        let at_eol = (ch == b'\r' && ch_next != b'\n') || ch == b'\n';

        if style == SECTION {
            header = true;
        }
        if at_eol {
            let level = line_level(line, header, visible_chars, fold_compact, styler);
            styler.set_level(line, level);
            line += 1;
            visible_chars = 0;
            header = false;
        } else if !is_space_char(ch as u32) {
            visible_chars += 1;
        }
    }

    // the line holding `end`, partial or empty
    let level = line_level(line, header, visible_chars, fold_compact, styler);
    styler.set_level(line, level);
}
