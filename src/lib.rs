//! # scilex
//!
//! An incremental styling and folding engine in the manner of editor
//! components: a lexer assigns a style byte to every byte of a document and
//! a fold level to every line, and can be restarted at any line after an
//! edit without restyling what came before.
//!
//! ## Features
//!
//! - **Document boundary**: lexers only see the [`Document`] trait; the
//!   host owns the text, styles, line states and fold levels
//! - **Buffered access**: [`accessor::LexAccessor`] batches reads and style
//!   writes, [`context::StyleContext`] walks characters for state machines
//! - **Configuration**: [`PropSetSimple`] properties with `$(var)` expansion
//!   and [`WordList`] keyword sets
//! - **Registry**: languages are [`LexerModule`]s looked up by name or
//!   identifier; every lexer is wrapped so a panic becomes a document status
//! - **Languages**: Ruby (heredocs, `%` literals, interpolation, regex
//!   detection), LaTeX (math modes, verbatim, sectioning folds) and
//!   properties files
//! - **Incremental restyling**: [`IncrementalStyler`] restarts at the line
//!   of an edit
//!
//! ## Quick Start
//!
//! ```rust
//! use scilex::{Document, Registry, TextDocument};
//! use scilex::lexers::ruby::style::{DEFAULT, DEFAULT_KEYWORDS, WORD};
//!
//! let registry = Registry::standard();
//! let mut lexer = registry.create_by_name("ruby").unwrap();
//! lexer.word_list_set(0, DEFAULT_KEYWORDS);
//!
//! let mut doc = TextDocument::new("def hello\nend\n");
//! let len = doc.len();
//! lexer.lex(0, len, DEFAULT, &mut doc);
//! lexer.fold(0, len, DEFAULT, &mut doc);
//!
//! assert_eq!(&doc.styles()[0..3], &[WORD; 3]);
//! ```
//!
//! ## Incremental Restyling
//!
//! ```rust
//! use scilex::{Edit, IncrementalStyler, Registry};
//!
//! let registry = Registry::standard();
//! let mut styler = IncrementalStyler::new("\\section{A}\n$x$\n", registry.create_by_name("latex").unwrap());
//!
//! let stats = styler.apply_edit(Edit::insert(12, "text ")).unwrap();
//! assert_eq!(stats.bytes_reused, 12);
//! ```

pub mod accessor;
pub mod charset;
pub mod context;
pub mod document;
pub mod error;
pub mod incremental;
pub mod language;
pub mod lexers;
pub mod props;
pub mod span;
pub mod wordlist;

pub use accessor::{Accessor, LexAccessor};
pub use context::StyleContext;
pub use document::{
    fold_depth, Document, Encoding, Line, Position, TextDocument, FOLD_LEVEL_BASE,
    FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_NUMBER_MASK, FOLD_LEVEL_WHITE_FLAG,
};
pub use error::{LexerError, Result, Status};
pub use incremental::{find_safe_restart_point, Edit, IncrementalStats, IncrementalStyler};
pub use language::{
    Guarded, Lexer, LexerBase, LexerModule, LexicalClass, Registry, RegistryBuilder,
    SimpleLexer,
};
pub use props::PropSetSimple;
pub use span::{Location, Span, StyleRun};
pub use wordlist::WordList;
