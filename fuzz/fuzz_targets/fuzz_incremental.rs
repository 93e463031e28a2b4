//! Incremental restyling fuzz target.
//!
//! Applies arbitrary edits through the incremental host. Invalid edits must
//! be rejected with an error; valid ones must leave the styles sized to the
//! new text.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scilex::{Edit, IncrementalStyler, Registry, Status};

#[derive(Debug, Arbitrary)]
enum Language {
    Ruby,
    Latex,
    Props,
}

#[derive(Debug, Arbitrary)]
struct FuzzEdit {
    start: u16,
    end: u16,
    text: String,
}

#[derive(Debug, Arbitrary)]
struct Input {
    language: Language,
    source: String,
    edits: Vec<FuzzEdit>,
}

fuzz_target!(|input: Input| {
    let name = match input.language {
        Language::Ruby => "ruby",
        Language::Latex => "latex",
        Language::Props => "props",
    };
    let Ok(lexer) = Registry::standard().create_by_name(name) else {
        return;
    };
    let mut styler = IncrementalStyler::new(&input.source, lexer);

    for edit in input.edits.into_iter().take(16) {
        let len = styler.document().text().len();
        let (start, end) = (edit.start as usize, edit.end as usize);
        let result = styler.apply_edit(Edit::new(start, end, edit.text));
        if start > end || end > len {
            assert!(result.is_err(), "edit {}..{} of {} accepted", start, end, len);
        } else {
            assert!(result.is_ok());
        }
        let doc = styler.document();
        assert_eq!(doc.styles().len(), doc.text().len());
        assert_eq!(doc.status(), Status::Ok);
    }
});
