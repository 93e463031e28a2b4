//! Lexer registration and dispatch.
//!
//! Every language is reached through the [`Lexer`] trait. Languages are
//! described by a [`LexerModule`]: an identifier, a name, and either a pair
//! of lex/fold functions (wrapped in a [`SimpleLexer`]) or a factory for a
//! stateful lexer. A [`Registry`] holds the modules a host knows about and
//! creates lexers by name or identifier; every lexer it hands out is wrapped
//! in [`Guarded`] so panics never reach the host.

mod base;
mod builder;
mod default;
mod guard;
mod module;

pub use base::{LexerBase, SimpleLexer, KEYWORDSET_MAX};
pub use builder::{Registry, RegistryBuilder};
pub use default::{language_for_extension, language_for_path, STANDARD_MODULES};
pub use guard::Guarded;
pub use module::{FactoryFn, FoldFn, LexFn, LexerModule};

use crate::document::{Document, Position};

/// A named style a lexer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalClass {
    /// Style byte.
    pub value: u8,
    /// Identifier-like name, e.g. `SCE_RB_WORD`.
    pub name: &'static str,
    /// Space separated classification tags.
    pub tags: &'static str,
    /// Human readable description.
    pub description: &'static str,
}

impl LexicalClass {
    /// Describe one style.
    pub const fn new(
        value: u8,
        name: &'static str,
        tags: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            value,
            name,
            tags,
            description,
        }
    }
}

/// The capability every lexer offers its host.
///
/// `property_set` and `word_list_set` return the position from which the
/// document must be relexed, `Some(0)` when the setting changed and `None`
/// when it did not.
pub trait Lexer {
    /// Language name, e.g. `"ruby"`.
    fn name(&self) -> &str;

    /// Stable language identifier.
    fn identifier(&self) -> i32;

    /// Properties the lexer reads.
    fn property_names(&self) -> &[&'static str] {
        &[]
    }

    /// Set a property.
    fn property_set(&mut self, key: &str, value: &str) -> Option<Position>;

    /// Current value of a property, empty when unset.
    fn property_get(&self, key: &str) -> String;

    /// Descriptions of the word lists the lexer accepts, in index order.
    fn describe_word_list_sets(&self) -> &[&'static str];

    /// Replace word list `n`.
    fn word_list_set(&mut self, n: usize, words: &str) -> Option<Position>;

    /// Styles the lexer produces.
    fn named_styles(&self) -> &[LexicalClass];

    /// Name of a style byte.
    fn name_of_style(&self, style: u8) -> Option<&'static str> {
        self.named_styles()
            .iter()
            .find(|class| class.value == style)
            .map(|class| class.name)
    }

    /// Style `[start, start + length)` of `doc`.
    ///
    /// `init_style` is the style in effect just before `start`. The lexer may
    /// start earlier than `start` to resynchronize.
    fn lex(&mut self, start: Position, length: Position, init_style: u8, doc: &mut dyn Document);

    /// Compute fold levels for the lines covering `[start, start + length)`.
    fn fold(&mut self, start: Position, length: Position, init_style: u8, doc: &mut dyn Document);
}

impl std::fmt::Debug for dyn Lexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("name", &self.name())
            .field("identifier", &self.identifier())
            .finish()
    }
}
