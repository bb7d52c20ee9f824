//! Template engine for `{{variable}}` substitution.
//!
//! A [`Template`] is compiled once from raw text into an immutable fragment
//! sequence and can then be rendered any number of times against different
//! variable sources.
//!
//! # Syntax
//!
//! - `{{name}}` - Substitutes the value of variable `name`. The name is the
//!   raw text between the delimiters: `{{ name }}` refers to `" name "`.
//! - Everything else is copied verbatim. There is no escape for `{{`.
//!
//! # Error Handling
//!
//! Parsing never fails. Rendering is all-or-nothing: an undefined variable
//! is an error rather than a silent empty substitution.

mod fragment;


pub use fragment::{Fragment, Fragments, parse_fragments};

use crate::error::{Result, TplError};
use std::collections::HashMap;
use std::iter::FusedIterator;
use std::path::Path;
use thiserror::Error;

/// Error type for template rendering failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder names a variable the source does not define.
    #[error("undefined variable '{name}' in template")]
    MissingVariable { name: String },
}

/// Anything that can resolve a variable name to its value.
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl VariableSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<V: VariableSource + ?Sized> VariableSource for &V {
    fn lookup(&self, name: &str) -> Option<&str> {
        (**self).lookup(name)
    }
}

/// An immutable compiled template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    fragments: Vec<Fragment>,
}

impl Template {
    /// Compile raw template text. Any text is accepted.
    pub fn parse(raw: &str) -> Self {
        Self {
            fragments: parse_fragments(raw).collect(),
        }
    }

    /// Read and compile the template file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| TplError::io("failed to read template", path, e))?;
        tracing::debug!(path = %path.display(), "loaded template");
        Ok(Self::parse(&raw))
    }

    /// Build a template from an explicit fragment sequence.
    ///
    /// Adjacent literals are merged and empty literals dropped, so the
    /// result has the same shape [`Template::parse`] would produce.
    pub fn from_fragments<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = Fragment>,
    {
        let mut merged: Vec<Fragment> = Vec::new();
        for fragment in fragments {
            match fragment {
                Fragment::Literal(text) if text.is_empty() => {}
                Fragment::Literal(text) => {
                    if let Some(Fragment::Literal(prev)) = merged.last_mut() {
                        prev.push_str(&text);
                    } else {
                        merged.push(Fragment::Literal(text));
                    }
                }
                variable => merged.push(variable),
            }
        }
        Self { fragments: merged }
    }

    /// The compiled fragment sequence, in render order.
    #[cfg(test)]
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Distinct variable names referenced by this template, in first-use order.
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for fragment in &self.fragments {
            if let Fragment::Variable(name) = fragment
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
        }
        names
    }

    /// Render the template to a single string.
    ///
    /// Fails on the first placeholder whose name `vars` does not define;
    /// no partial output is returned.
    pub fn render<V: VariableSource + ?Sized>(
        &self,
        vars: &V,
    ) -> std::result::Result<String, TemplateError> {
        self.render_iter(vars).collect()
    }

    /// Render the template piece by piece without building the full string.
    ///
    /// Each call starts a fresh pass over the stored fragments, so a template
    /// can be streamed any number of times.
    pub fn render_iter<'a, V: VariableSource + ?Sized>(&'a self, vars: &'a V) -> RenderIter<'a, V> {
        RenderIter {
            fragments: self.fragments.iter(),
            vars,
        }
    }
}

/// Streaming renderer returned by [`Template::render_iter`].
pub struct RenderIter<'a, V: ?Sized> {
    fragments: std::slice::Iter<'a, Fragment>,
    vars: &'a V,
}

impl<'a, V: VariableSource + ?Sized> Iterator for RenderIter<'a, V> {
    type Item = std::result::Result<&'a str, TemplateError>;

    fn next(&mut self) -> Option<Self::Item> {
        let vars = self.vars;
        let fragment = self.fragments.next()?;
        Some(match fragment {
            Fragment::Literal(text) => Ok(text.as_str()),
            Fragment::Variable(name) => vars
                .lookup(name)
                .ok_or_else(|| TemplateError::MissingVariable { name: name.clone() }),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.fragments.size_hint()
    }
}

impl<V: VariableSource + ?Sized> FusedIterator for RenderIter<'_, V> {}

/// Helper to create a variables map from a list of key-value pairs.
#[cfg(test)]
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
