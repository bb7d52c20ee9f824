//! Error types for the tplsync CLI.
//!
//! Uses thiserror for derive macros. Every variant carries enough context
//! (path, line, variable name) for the message to be actionable on its own.

use crate::exit_codes;
use crate::template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tplsync operations.
///
/// An out-of-sync artifact in check mode is not an error: it is reported
/// through [`crate::generate::CheckReport`] and mapped to its own exit code.
#[derive(Error, Debug)]
pub enum TplError {
    /// A template, environment, config or output path could not be read or written.
    #[error("{action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The environment file does not start with the `env:` header.
    #[error("{}:{line}: expected header 'env:'", .path.display())]
    MissingHeader { path: PathBuf, line: usize },

    /// A line under the header is not a `  KEY: "value"` declaration.
    #[error("{}:{line}: invalid declaration '{content}' (expected '  KEY: \"value\"')", .path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        content: String,
    },

    /// The same key is declared twice in the environment file.
    #[error("{}:{line}: duplicate key '{key}' (first declared on line {first_line})", .path.display())]
    DuplicateKey {
        path: PathBuf,
        line: usize,
        key: String,
        first_line: usize,
    },

    /// A placeholder has no value in the variable mapping.
    #[error("template '{}' references undefined variable '{name}'", .template.display())]
    MissingVariable { name: String, template: PathBuf },

    /// Invalid configuration or command-line usage.
    #[error("{0}")]
    Config(String),
}

impl TplError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            TplError::Io { .. } => exit_codes::IO_FAILURE,
            TplError::MissingHeader { .. }
            | TplError::Syntax { .. }
            | TplError::DuplicateKey { .. } => exit_codes::SYNTAX_ERROR,
            TplError::MissingVariable { .. } => exit_codes::RENDER_ERROR,
            TplError::Config(_) => exit_codes::CONFIG_ERROR,
        }
    }

    /// Shorthand for wrapping an I/O failure with the path it concerns.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TplError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Attach the template path to a render failure.
    pub fn from_template(err: TemplateError, template: impl Into<PathBuf>) -> Self {
        match err {
            TemplateError::MissingVariable { name } => TplError::MissingVariable {
                name,
                template: template.into(),
            },
        }
    }
}

/// Result type alias for tplsync operations.
pub type Result<T> = std::result::Result<T, TplError>;
