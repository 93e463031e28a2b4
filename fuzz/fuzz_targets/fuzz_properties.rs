//! Property set fuzz target.
//!
//! Loads arbitrary text as a property file, expands every key and styles the
//! same text with the properties lexer.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scilex::{Document, PropSetSimple, Registry, Status, TextDocument};

fuzz_target!(|data: &str| {
    let mut props = PropSetSimple::new();
    props.set_multiple(data);

    let keys: Vec<String> = props.iter().map(|(key, _)| key.to_string()).collect();
    for key in &keys {
        // Expansion must terminate even on reference cycles
        let _ = props.get_expanded(key);
        let _ = props.get_int(key, 0);
    }

    let Ok(mut lexer) = Registry::standard().create_by_name("props") else {
        return;
    };
    for (key, value) in props.iter() {
        lexer.property_set(key, value);
    }
    let mut doc = TextDocument::new(data);
    let len = doc.len();
    lexer.lex(0, len, 0, &mut doc);
    lexer.fold(0, len, 0, &mut doc);
    assert_eq!(doc.status(), Status::Ok);
});
