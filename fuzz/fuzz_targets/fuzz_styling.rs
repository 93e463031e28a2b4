//! Styling fuzz target.
//!
//! Styles and folds arbitrary bytes with every registered lexer and checks
//! the document invariants afterwards.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scilex::{Document, Registry, Status, TextDocument, FOLD_LEVEL_NUMBER_MASK};

fuzz_target!(|data: &[u8]| {
    let registry = Registry::standard();
    for module in registry.modules() {
        let mut lexer = module.create();
        let mut doc = TextDocument::new(data);
        let len = doc.len();
        lexer.lex(0, len, 0, &mut doc);
        lexer.fold(0, len, 0, &mut doc);
        verify_invariants(module.name(), lexer.as_ref(), &doc);
    }
});

fn verify_invariants(name: &str, lexer: &dyn scilex::Lexer, doc: &TextDocument) {
    // A panic inside a lexer would surface here as a failure status
    assert_eq!(doc.status(), Status::Ok, "{} reported failure", name);

    assert_eq!(doc.styles().len(), doc.text().len());
    for &style in doc.styles() {
        assert!(
            lexer.name_of_style(style).is_some(),
            "{} produced undeclared style {}",
            name,
            style
        );
    }

    for &level in doc.levels() {
        assert!(level & FOLD_LEVEL_NUMBER_MASK >= 0);
    }
}
