//! Fragment parser: splits raw template text into literal and placeholder pieces.

use regex::{CaptureMatches, Regex};
use std::iter::FusedIterator;
use std::sync::LazyLock;

/// Matches one `{{name}}` placeholder. Non-greedy, so `{{a}}{{b}}` is two
/// placeholders. The inner text is taken verbatim (no trimming) and may be empty.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("Invalid placeholder regex"));

/// One atomic piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// Text copied to the output unchanged.
    Literal(String),
    /// A `{{name}}` reference, resolved against the variable mapping at render time.
    Variable(String),
}

impl Fragment {
    /// Create a literal fragment.
    pub fn literal(text: impl Into<String>) -> Self {
        Fragment::Literal(text.into())
    }

    /// Create a variable fragment.
    pub fn variable(name: impl Into<String>) -> Self {
        Fragment::Variable(name.into())
    }

    /// The template text this fragment was parsed from.
    #[cfg(test)]
    pub fn to_source(&self) -> String {
        match self {
            Fragment::Literal(text) => text.clone(),
            Fragment::Variable(name) => format!("{{{{{}}}}}", name),
        }
    }
}

/// Lazy, single-pass iterator over the fragments of a template string.
///
/// Literal runs between placeholders are emitted as one fragment each, so
/// the sequence never holds two adjacent literals. Empty input yields nothing.
pub struct Fragments<'t> {
    text: &'t str,
    matches: CaptureMatches<'static, 't>,
    cursor: usize,
    pending: Option<Fragment>,
}

impl<'t> Fragments<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            matches: PLACEHOLDER_REGEX.captures_iter(text),
            cursor: 0,
            pending: None,
        }
    }
}

impl Iterator for Fragments<'_> {
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        if let Some(fragment) = self.pending.take() {
            return Some(fragment);
        }

        match self.matches.next() {
            Some(caps) => {
                let whole = caps.get(0).expect("capture group 0 always participates");
                let name = caps.get(1).map_or("", |m| m.as_str());
                let variable = Fragment::variable(name);

                let start = self.cursor;
                self.cursor = whole.end();

                if start < whole.start() {
                    self.pending = Some(variable);
                    Some(Fragment::literal(&self.text[start..whole.start()]))
                } else {
                    Some(variable)
                }
            }
            None if self.cursor < self.text.len() => {
                let tail = &self.text[self.cursor..];
                self.cursor = self.text.len();
                Some(Fragment::literal(tail))
            }
            None => None,
        }
    }
}

impl FusedIterator for Fragments<'_> {}

/// Split `text` into fragments, left to right.
///
/// Never fails: any text is a valid template. There is no escape for a
/// literal `{{`.
pub fn parse_fragments(text: &str) -> Fragments<'_> {
    Fragments::new(text)
}
