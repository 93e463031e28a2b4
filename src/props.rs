//! Lexer properties.
//!
//! [`PropSetSimple`] is a flat string map. Values may refer to other
//! properties with `$(name)`; [`PropSetSimple::get_expanded`] substitutes
//! them, innermost first, with a fixed expansion budget. A property that
//! refers to itself, directly or through others, expands to nothing.

use std::collections::BTreeMap;

use crate::error::{LexerError, Result};

/// Upper bound on `$(...)` substitutions performed for a single lookup.
pub const MAX_EXPANDS: usize = 100;

/// Names currently being expanded, innermost last.
struct VarChain<'a> {
    var: &'a str,
    link: Option<&'a VarChain<'a>>,
}

impl<'a> VarChain<'a> {
    fn root(var: &'a str) -> Self {
        Self { var, link: None }
    }

    fn push<'b>(&'b self, var: &'b str) -> VarChain<'b>
    where
        'a: 'b,
    {
        VarChain {
            var,
            link: Some(self),
        }
    }

    fn contains(&self, var: &str) -> bool {
        let mut chain = Some(self);
        while let Some(link) = chain {
            if link.var == var {
                return true;
            }
            chain = link.link;
        }
        false
    }
}

/// A key to value string map with variable expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropSetSimple {
    props: BTreeMap<String, String>,
}

impl PropSetSimple {
    /// An empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    ///
    /// An empty key is ignored. Returns whether the stored value changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        match self.props.get_mut(key) {
            Some(existing) if *existing == value => false,
            Some(existing) => {
                *existing = value.to_string();
                true
            }
            None => {
                self.props.insert(key.to_string(), value.to_string());
                true
            }
        }
    }

    /// Set from a single `key=value` line; a bare `key` means `key=1`.
    ///
    /// Leading whitespace is skipped and the value runs to the end of the
    /// line. Returns whether anything changed.
    pub fn set_line(&mut self, line: &str) -> bool {
        let line = line.trim_start().trim_end_matches(['\r', '\n']);
        match line.split_once('=') {
            Some((key, value)) => self.set(key, value),
            None if !line.is_empty() => self.set(line, "1"),
            None => false,
        }
    }

    /// Set every `key=value` line of `text`.
    ///
    /// Lines starting with `#` are comments. Returns whether anything
    /// changed.
    pub fn set_multiple(&mut self, text: &str) -> bool {
        let mut changed = false;
        for line in text.split('\n') {
            if line.trim_start().starts_with('#') {
                continue;
            }
            changed |= self.set_line(line);
        }
        changed
    }

    /// Parse and apply a command-line style `key=value` assignment.
    pub fn set_assignment(&mut self, assignment: &str) -> Result<bool> {
        match assignment.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => Ok(self.set(key.trim(), value)),
            _ => Err(LexerError::InvalidProperty(assignment.to_string())),
        }
    }

    /// Raw value of `key`, empty when unset.
    pub fn get(&self, key: &str) -> &str {
        self.props.get(key).map(String::as_str).unwrap_or("")
    }

    /// Whether `key` has been set.
    pub fn contains(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Value of `key` with every `$(name)` reference substituted.
    pub fn get_expanded(&self, key: &str) -> String {
        let mut value = self.get(key).to_string();
        self.expand_all_in_place(&mut value, MAX_EXPANDS, &VarChain::root(key));
        value
    }

    /// Expanded value of `key` parsed as a leading integer.
    ///
    /// Returns `default` when the value is empty or does not start with a
    /// number.
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        let value = self.get_expanded(key);
        parse_leading_int(&value).unwrap_or(default)
    }

    /// Properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.props.len()
    }

    /// Whether no property is set.
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    fn expand_all_in_place(
        &self,
        with_vars: &mut String,
        mut max_expands: usize,
        blank_vars: &VarChain<'_>,
    ) -> usize {
        let mut var_start = with_vars.find("$(");
        while let Some(mut start) = var_start {
            if max_expands == 0 {
                break;
            }
            let Some(end) = with_vars[start + 2..].find(')').map(|i| i + start + 2) else {
                break;
            };
            // In '$(ab$(cde))' the inner reference is expanded first.
            while let Some(inner) = with_vars[start + 2..].find("$(").map(|i| i + start + 2) {
                if inner >= end {
                    break;
                }
                start = inner;
            }

            let var = with_vars[start + 2..end].to_string();
            let mut value = if blank_vars.contains(&var) {
                String::new()
            } else {
                self.get(&var).to_string()
            };
            max_expands -= 1;
            if max_expands > 0 {
                max_expands = self.expand_all_in_place(&mut value, max_expands, &blank_vars.push(&var));
            }
            with_vars.replace_range(start..=end, &value);
            var_start = with_vars.find("$(");
        }
        max_expands
    }
}

fn parse_leading_int(value: &str) -> Option<i32> {
    let trimmed = value.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    trimmed[..end].parse::<i64>().ok().map(|n| n.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}
