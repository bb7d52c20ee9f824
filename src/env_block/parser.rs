//! Line-oriented parser for the `env:` block.

use super::VariableMapping;
use crate::error::{Result, TplError};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// The single header line every environment file starts with.
pub const HEADER: &str = "env:";

/// `  KEY: "value"` with an optional trailing `# comment`.
static DECLARATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^  ([A-Za-z_][A-Za-z0-9_]*): "([^"]*)"[ \t]*(?:#.*)?$"#)
        .expect("Invalid declaration regex")
});

/// Read and parse the environment file at `path`.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<VariableMapping> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| TplError::io("failed to read environment file", path, e))?;
    let mapping = parse_str(&text, path)?;
    tracing::debug!(
        path = %path.display(),
        keys = ?mapping.keys().collect::<Vec<_>>(),
        "parsed environment block"
    );
    Ok(mapping)
}

/// Parse environment text. `origin` is only used in error messages.
///
/// Fails on the first structural problem; no partial mapping is returned.
/// A key declared twice is an error, never "last one wins".
pub fn parse_str(text: &str, origin: &Path) -> Result<VariableMapping> {
    let mut mapping = VariableMapping::new();
    // Declaration line of each entry, indexed by mapping position.
    let mut decl_lines: Vec<usize> = Vec::new();
    let mut seen_header = false;
    let mut line_count = 0;

    // Editors on some platforms prefix UTF-8 files with a byte order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        line_count = line_no;

        if is_blank_or_comment(line) {
            continue;
        }

        if !seen_header {
            if line != HEADER {
                return Err(TplError::MissingHeader {
                    path: origin.to_path_buf(),
                    line: line_no,
                });
            }
            seen_header = true;
            continue;
        }

        let Some(caps) = DECLARATION_REGEX.captures(line) else {
            return Err(TplError::Syntax {
                path: origin.to_path_buf(),
                line: line_no,
                content: line.to_string(),
            });
        };
        let key = &caps[1];
        let value = &caps[2];

        if let Err(pos) = mapping.insert(key, value) {
            return Err(TplError::DuplicateKey {
                path: origin.to_path_buf(),
                line: line_no,
                key: key.to_string(),
                first_line: decl_lines[pos],
            });
        }
        decl_lines.push(line_no);
    }

    if !seen_header {
        return Err(TplError::MissingHeader {
            path: origin.to_path_buf(),
            line: line_count + 1,
        });
    }

    Ok(mapping)
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}
