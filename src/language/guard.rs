//! Panic containment at the lexer boundary.
//!
//! A panic inside a lexer must not unwind into the host. [`Guarded`] catches
//! it at the entry points, logs it, and records
//! [`Status::Failure`](crate::error::Status::Failure) on the
//! document; the call then returns normally.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::error;

use super::{Lexer, LexicalClass};
use crate::document::{Document, Position};
use crate::error::LexerError;

/// Wraps a lexer so its panics become a document error status.
pub struct Guarded {
    inner: Box<dyn Lexer>,
    last_failure: Option<LexerError>,
}

impl Guarded {
    /// Wrap `inner`.
    pub fn new(inner: Box<dyn Lexer>) -> Self {
        Self {
            inner,
            last_failure: None,
        }
    }

    /// The most recent contained panic, if any, clearing it.
    pub fn take_failure(&mut self) -> Option<LexerError> {
        self.last_failure.take()
    }

    fn record(&mut self, operation: &str, payload: Box<dyn Any + Send>) -> LexerError {
        let message = panic_message(payload.as_ref());
        error!("{} {} panicked: {}", self.inner.name(), operation, message);
        let failure = LexerError::Panicked(message.clone());
        self.last_failure = Some(LexerError::Panicked(message));
        failure
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Lexer for Guarded {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn identifier(&self) -> i32 {
        self.inner.identifier()
    }

    fn property_names(&self) -> &[&'static str] {
        self.inner.property_names()
    }

    fn property_set(&mut self, key: &str, value: &str) -> Option<Position> {
        let inner = &mut self.inner;
        match catch_unwind(AssertUnwindSafe(|| inner.property_set(key, value))) {
            Ok(result) => result,
            Err(payload) => {
                self.record("property_set", payload);
                None
            }
        }
    }

    fn property_get(&self, key: &str) -> String {
        self.inner.property_get(key)
    }

    fn describe_word_list_sets(&self) -> &[&'static str] {
        self.inner.describe_word_list_sets()
    }

    fn word_list_set(&mut self, n: usize, words: &str) -> Option<Position> {
        let inner = &mut self.inner;
        match catch_unwind(AssertUnwindSafe(|| inner.word_list_set(n, words))) {
            Ok(result) => result,
            Err(payload) => {
                self.record("word_list_set", payload);
                None
            }
        }
    }

    fn named_styles(&self) -> &[LexicalClass] {
        self.inner.named_styles()
    }

    fn lex(&mut self, start: Position, length: Position, init_style: u8, doc: &mut dyn Document) {
        let inner = &mut self.inner;
        let result = catch_unwind(AssertUnwindSafe(|| {
            inner.lex(start, length, init_style, &mut *doc)
        }));
        if let Err(payload) = result {
            let failure = self.record("lex", payload);
            doc.set_error_status(failure.status());
        }
    }

    fn fold(&mut self, start: Position, length: Position, init_style: u8, doc: &mut dyn Document) {
        let inner = &mut self.inner;
        let result = catch_unwind(AssertUnwindSafe(|| {
            inner.fold(start, length, init_style, &mut *doc)
        }));
        if let Err(payload) = result {
            let failure = self.record("fold", payload);
            doc.set_error_status(failure.status());
        }
    }
}
