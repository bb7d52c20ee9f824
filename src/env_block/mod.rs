//! The `env:` key/value block that supplies template variables.
//!
//! The same file is both the variable source for rendered templates and the
//! verbatim `env:` section of the generated CI workflow, so it is kept to a
//! strict subset of YAML:
//!
//! ```text
//! env:
//!   # comment
//!   NGINX_VERSION: "1.27.4"  # trailing comment
//! ```

mod parser;


pub use parser::{HEADER, parse_file, parse_str};

use crate::template::VariableSource;
use std::collections::HashMap;

/// Ordered variable name to value mapping.
///
/// Iteration follows declaration order; lookups are by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableMapping {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl VariableMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new variable and return its declaration position.
    ///
    /// A key that is already present is refused: the mapping is left
    /// unchanged and the position of the existing entry is returned as the
    /// error. There is no "last one wins".
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> std::result::Result<usize, usize> {
        let key = key.into();
        if let Some(&pos) = self.index.get(&key) {
            return Err(pos);
        }
        let pos = self.entries.len();
        self.index.insert(key.clone(), pos);
        self.entries.push((key, value.into()));
        Ok(pos)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl VariableSource for VariableMapping {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}
