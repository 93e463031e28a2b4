//! The language registry and its builder.

use log::debug;

use super::module::LexerModule;
use super::Lexer;
use crate::error::{LexerError, Result};

/// Languages known to a host, looked up by name or identifier.
///
/// # Example
///
/// ```
/// use scilex::language::Registry;
///
/// let registry = Registry::standard();
/// let lexer = registry.create_by_name("ruby").unwrap();
/// assert_eq!(lexer.identifier(), 22);
/// assert!(registry.create_by_name("cobol").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: Vec<LexerModule>,
}

impl Registry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Every registered module, in registration order.
    pub fn modules(&self) -> &[LexerModule] {
        &self.modules
    }

    /// Names of the registered languages.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.iter().map(LexerModule::name)
    }

    /// Number of registered languages.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no language is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module registered under `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&LexerModule> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// Module registered under `language`.
    pub fn find_by_id(&self, language: i32) -> Option<&LexerModule> {
        self.modules
            .iter()
            .find(|module| module.language() == language)
    }

    /// Create a lexer for the language called `name`.
    pub fn create_by_name(&self, name: &str) -> Result<Box<dyn Lexer>> {
        self.find_by_name(name)
            .map(LexerModule::create)
            .ok_or_else(|| LexerError::UnknownLanguage(name.to_string()))
    }

    /// Create a lexer for the language with identifier `language`.
    pub fn create_by_id(&self, language: i32) -> Result<Box<dyn Lexer>> {
        self.find_by_id(language)
            .map(LexerModule::create)
            .ok_or(LexerError::UnknownLanguageId(language))
    }
}

/// Builder for a [`Registry`].
///
/// Registering a name twice keeps the later module.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    modules: Vec<LexerModule>,
}

impl RegistryBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one module.
    pub fn module(mut self, module: LexerModule) -> Self {
        if let Some(existing) = self
            .modules
            .iter_mut()
            .find(|existing| existing.name() == module.name())
        {
            debug!("replacing lexer module '{}'", module.name());
            *existing = module;
        } else {
            self.modules.push(module);
        }
        self
    }

    /// Register several modules.
    pub fn modules(self, modules: &[LexerModule]) -> Self {
        modules
            .iter()
            .fold(self, |builder, module| builder.module(*module))
    }

    /// Build the registry.
    pub fn build(self) -> Registry {
        Registry {
            modules: self.modules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::Accessor;
    use crate::document::Position;
    use crate::wordlist::WordList;

    fn lex_nothing(_: Position, _: Position, _: u8, _: &[WordList], _: &mut Accessor<'_>) {}

    const FIRST: LexerModule = LexerModule::new(100, "plain", lex_nothing, None, &[], &[]);
    const SECOND: LexerModule =
        LexerModule::new(101, "plain", lex_nothing, None, &["Words"], &[]);
    const OTHER: LexerModule = LexerModule::new(102, "other", lex_nothing, None, &[], &[]);

    #[test]
    fn test_builder_registers_modules() {
        let registry = Registry::builder().module(FIRST).module(OTHER).build();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["plain", "other"]);
        assert_eq!(registry.find_by_id(102).map(LexerModule::name), Some("other"));
        assert!(registry.find_by_name("missing").is_none());
    }

    #[test]
    fn test_later_registration_wins() {
        let registry = Registry::builder().modules(&[FIRST, OTHER, SECOND]).build();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_name("plain").map(LexerModule::language), Some(101));
    }

    #[test]
    fn test_create_errors() {
        let registry = Registry::builder().module(FIRST).build();
        let lexer = registry.create_by_name("plain").unwrap();
        assert_eq!(lexer.name(), "plain");
        assert!(matches!(
            registry.create_by_name("ruby"),
            Err(LexerError::UnknownLanguage(name)) if name == "ruby"
        ));
        assert!(matches!(
            registry.create_by_id(7),
            Err(LexerError::UnknownLanguageId(7))
        ));
    }
}
