//! The languages shipped with the crate.

use std::path::Path;

use super::builder::Registry;
use super::module::LexerModule;
use crate::lexers::{latex, props, ruby};

/// Every built-in language.
pub static STANDARD_MODULES: &[LexerModule] = &[ruby::MODULE, latex::MODULE, props::MODULE];

impl Registry {
    /// A registry holding every built-in language.
    pub fn standard() -> Self {
        Registry::builder().modules(STANDARD_MODULES).build()
    }
}

/// Built-in language for a file extension, compared case-insensitively.
pub fn language_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "rb" | "rbw" | "rake" | "gemspec" | "ru" => Some(ruby::MODULE.name()),
        "tex" | "sty" | "cls" | "ltx" | "dtx" => Some(latex::MODULE.name()),
        "properties" | "ini" | "cfg" | "conf" | "inf" | "reg" | "editorconfig" => {
            Some(props::MODULE.name())
        }
        _ => None,
    }
}

/// Built-in language for a path, by special file name or extension.
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        match name {
            "Rakefile" | "Gemfile" | "Guardfile" | "Vagrantfile" => return Some(ruby::MODULE.name()),
            _ => {}
        }
    }
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(language_for_extension)
}
