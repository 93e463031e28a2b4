//! Language descriptions.

use super::base::SimpleLexer;
use super::guard::Guarded;
use super::{Lexer, LexicalClass};
use crate::accessor::Accessor;
use crate::document::Position;
use crate::wordlist::WordList;

/// A lexing function: `(start, length, init_style, word_lists, styler)`.
pub type LexFn = fn(Position, Position, u8, &[WordList], &mut Accessor<'_>);

/// A folding function, same arguments as [`LexFn`].
pub type FoldFn = fn(Position, Position, u8, &[WordList], &mut Accessor<'_>);

/// Creates a stateful lexer.
pub type FactoryFn = fn() -> Box<dyn Lexer>;

#[derive(Clone, Copy)]
enum Kind {
    Functions { lex: LexFn, fold: Option<FoldFn> },
    Factory(FactoryFn),
}

/// Everything a registry needs to know about one language.
#[derive(Clone, Copy)]
pub struct LexerModule {
    language: i32,
    name: &'static str,
    kind: Kind,
    word_list_descriptions: &'static [&'static str],
    styles: &'static [LexicalClass],
}

impl LexerModule {
    /// A language implemented by plain functions.
    pub const fn new(
        language: i32,
        name: &'static str,
        lex: LexFn,
        fold: Option<FoldFn>,
        word_list_descriptions: &'static [&'static str],
        styles: &'static [LexicalClass],
    ) -> Self {
        Self {
            language,
            name,
            kind: Kind::Functions { lex, fold },
            word_list_descriptions,
            styles,
        }
    }

    /// A language implemented by a stateful lexer.
    pub const fn with_factory(
        language: i32,
        name: &'static str,
        factory: FactoryFn,
        word_list_descriptions: &'static [&'static str],
        styles: &'static [LexicalClass],
    ) -> Self {
        Self {
            language,
            name,
            kind: Kind::Factory(factory),
            word_list_descriptions,
            styles,
        }
    }

    /// Language identifier.
    pub fn language(&self) -> i32 {
        self.language
    }

    /// Language name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Descriptions of the word lists, in index order.
    pub fn word_list_descriptions(&self) -> &'static [&'static str] {
        self.word_list_descriptions
    }

    /// Styles the language produces.
    pub fn styles(&self) -> &'static [LexicalClass] {
        self.styles
    }

    /// Whether the language can fold.
    pub fn can_fold(&self) -> bool {
        match self.kind {
            Kind::Functions { fold, .. } => fold.is_some(),
            Kind::Factory(_) => true,
        }
    }

    /// Create a lexer for this language, wrapped so panics are contained.
    pub fn create(&self) -> Box<dyn Lexer> {
        let lexer: Box<dyn Lexer> = match self.kind {
            Kind::Functions { .. } => Box::new(SimpleLexer::new(*self)),
            Kind::Factory(factory) => factory(),
        };
        Box::new(Guarded::new(lexer))
    }

    /// Run the lex function directly.
    ///
    /// Factory languages have no lex function and do nothing here.
    pub fn lex(
        &self,
        start: Position,
        length: Position,
        init_style: u8,
        word_lists: &[WordList],
        styler: &mut Accessor<'_>,
    ) {
        if let Kind::Functions { lex, .. } = self.kind {
            lex(start, length, init_style, word_lists, styler);
        }
    }

    /// Run the fold function directly, if there is one.
    pub fn fold(
        &self,
        start: Position,
        length: Position,
        init_style: u8,
        word_lists: &[WordList],
        styler: &mut Accessor<'_>,
    ) {
        if let Kind::Functions { fold: Some(fold), .. } = self.kind {
            fold(start, length, init_style, word_lists, styler);
        }
    }
}

impl std::fmt::Debug for LexerModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexerModule")
            .field("language", &self.language)
            .field("name", &self.name)
            .field("word_lists", &self.word_list_descriptions)
            .finish()
    }
}
