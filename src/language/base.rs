//! Shared lexer state and the adapter for function-based languages.

use log::debug;

use super::module::LexerModule;
use super::{Lexer, LexicalClass};
use crate::accessor::Accessor;
use crate::document::{Document, Position};
use crate::props::PropSetSimple;
use crate::wordlist::WordList;

/// Most word lists a lexer keeps.
pub const KEYWORDSET_MAX: usize = 9;

/// Properties and word lists, the state every lexer carries.
#[derive(Debug, Clone, Default)]
pub struct LexerBase {
    /// Lexer properties.
    pub props: PropSetSimple,
    /// Word lists, [`KEYWORDSET_MAX`] of them.
    pub word_lists: Vec<WordList>,
}

impl LexerBase {
    /// Empty properties and word lists.
    pub fn new() -> Self {
        Self {
            props: PropSetSimple::new(),
            word_lists: vec![WordList::new(); KEYWORDSET_MAX],
        }
    }

    /// Set a property; `Some(0)` when it changed.
    pub fn property_set(&mut self, key: &str, value: &str) -> Option<Position> {
        if self.props.get(key) != value && self.props.set(key, value) {
            Some(0)
        } else {
            None
        }
    }

    /// Current value of a property.
    pub fn property_get(&self, key: &str) -> String {
        self.props.get(key).to_string()
    }

    /// Replace word list `n`; `Some(0)` when it changed.
    pub fn word_list_set(&mut self, n: usize, words: &str) -> Option<Position> {
        match self.word_lists.get_mut(n) {
            Some(list) => list.set(words).then_some(0),
            None => None,
        }
    }
}

/// A [`Lexer`] driving the functions of a [`LexerModule`].
#[derive(Debug)]
pub struct SimpleLexer {
    module: LexerModule,
    base: LexerBase,
}

impl SimpleLexer {
    /// Wrap `module`.
    pub fn new(module: LexerModule) -> Self {
        Self {
            module,
            base: LexerBase::new(),
        }
    }
}

impl Lexer for SimpleLexer {
    fn name(&self) -> &str {
        self.module.name()
    }

    fn identifier(&self) -> i32 {
        self.module.language()
    }

    fn property_names(&self) -> &[&'static str] {
        &["fold", "fold.compact", "fold.comment"]
    }

    fn property_set(&mut self, key: &str, value: &str) -> Option<Position> {
        self.base.property_set(key, value)
    }

    fn property_get(&self, key: &str) -> String {
        self.base.property_get(key)
    }

    fn describe_word_list_sets(&self) -> &[&'static str] {
        self.module.word_list_descriptions()
    }

    fn word_list_set(&mut self, n: usize, words: &str) -> Option<Position> {
        if n >= self.module.word_list_descriptions().len() {
            return None;
        }
        self.base.word_list_set(n, words)
    }

    fn named_styles(&self) -> &[LexicalClass] {
        self.module.styles()
    }

    fn lex(&mut self, start: Position, length: Position, init_style: u8, doc: &mut dyn Document) {
        debug!(
            "{}: lex {}..{} from style {}",
            self.module.name(),
            start,
            start + length,
            init_style
        );
        let mut styler = Accessor::new(doc, &self.base.props);
        self.module
            .lex(start, length, init_style, &self.base.word_lists, &mut styler);
        styler.flush();
    }

    fn fold(&mut self, start: Position, length: Position, init_style: u8, doc: &mut dyn Document) {
        if self.base.props.get_int("fold", 1) == 0 {
            return;
        }
        debug!(
            "{}: fold {}..{}",
            self.module.name(),
            start,
            start + length
        );
        let mut styler = Accessor::new(doc, &self.base.props);
        self.module
            .fold(start, length, init_style, &self.base.word_lists, &mut styler);
        styler.flush();
    }
}
