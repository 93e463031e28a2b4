//! Built-in languages.

pub mod latex;
pub mod props;
pub mod ruby;
