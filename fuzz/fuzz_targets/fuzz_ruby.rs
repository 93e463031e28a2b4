//! Ruby fuzz target.
//!
//! Drives the Ruby lexer with arbitrary keywords, properties and a starting
//! offset so resumed styling is exercised, not only full passes.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scilex::lexers::ruby::style::DEFAULT_KEYWORDS;
use scilex::{Document, Registry, Status, TextDocument};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    source: &'a [u8],
    custom_keywords: Option<&'a str>,
    fold: bool,
    fold_compact: bool,
    fold_comment: bool,
    resume_at: u16,
}

fuzz_target!(|input: Input<'_>| {
    let Ok(mut lexer) = Registry::standard().create_by_name("ruby") else {
        return;
    };
    lexer.word_list_set(0, input.custom_keywords.unwrap_or(DEFAULT_KEYWORDS));
    lexer.property_set("fold", if input.fold { "1" } else { "0" });
    lexer.property_set("fold.compact", if input.fold_compact { "1" } else { "0" });
    lexer.property_set("fold.comment", if input.fold_comment { "1" } else { "0" });

    let mut doc = TextDocument::new(input.source);
    let len = doc.len();
    lexer.lex(0, len, 0, &mut doc);
    lexer.fold(0, len, 0, &mut doc);

    // Resume from an arbitrary line start with the style found there
    let line = doc.line_from_position(input.resume_at as isize % (len + 1));
    let start = doc.line_start(line);
    let init = if start > 0 { doc.style_at(start - 1) } else { 0 };
    lexer.lex(start, len - start, init, &mut doc);
    lexer.fold(start, len - start, init, &mut doc);

    assert_eq!(doc.status(), Status::Ok);
    assert_eq!(doc.styles().len(), input.source.len());
});
