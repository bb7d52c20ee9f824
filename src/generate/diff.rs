//! Diff diagnostics for out-of-sync artifacts.
//!
//! The in-process byte comparison decides whether an artifact is in sync.
//! The diff tool only produces the text shown to the operator.

use crate::error::{Result, TplError};
use std::path::Path;
use std::process::Command;

/// Command used when `DIFF_TOOL` is not set.
pub const DEFAULT_DIFF_TOOL: &str = "diff -u";

/// Keyword selecting the in-process summary instead of an external command.
pub const BUILTIN_DIFF_TOOL: &str = "builtin";

/// How mismatch diagnostics are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffTool {
    /// Run `program args... <generated> <tracked>` and capture its output.
    External { program: String, args: Vec<String> },
    /// Report the first differing line without spawning anything.
    Builtin,
}

impl Default for DiffTool {
    fn default() -> Self {
        DiffTool::External {
            program: "diff".to_string(),
            args: vec!["-u".to_string()],
        }
    }
}

impl DiffTool {
    /// Parse a command line such as `diff -u` or `git diff --no-index`.
    pub fn parse(command: &str) -> Result<Self> {
        let command = command.trim();
        if command == BUILTIN_DIFF_TOOL {
            return Ok(DiffTool::Builtin);
        }

        let mut words = shell_words::split(command).map_err(|e| {
            TplError::Config(format!(
                "failed to parse diff tool command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command, e
            ))
        })?;

        if words.is_empty() {
            return Err(TplError::Config(
                "diff tool command is empty (use 'builtin' for the in-process summary)".to_string(),
            ));
        }

        let program = words.remove(0);
        Ok(DiffTool::External {
            program,
            args: words,
        })
    }

    /// Describe how `generated` differs from `tracked`.
    ///
    /// Never fails: if the external tool cannot be spawned the builtin
    /// summary is returned instead.
    pub fn describe(&self, generated: &Path, tracked: &Path) -> String {
        match self {
            DiffTool::External { program, args } => {
                match run_external(program, args, generated, tracked) {
                    Ok(output) => output,
                    Err(e) => {
                        tracing::warn!(
                            tool = %program,
                            error = %e,
                            "diff tool unavailable, falling back to builtin summary"
                        );
                        builtin_from_files(generated, tracked)
                    }
                }
            }
            DiffTool::Builtin => builtin_from_files(generated, tracked),
        }
    }
}

fn run_external(
    program: &str,
    args: &[String],
    generated: &Path,
    tracked: &Path,
) -> std::io::Result<String> {
    let output = Command::new(program)
        .args(args)
        .arg(generated)
        .arg(tracked)
        .output()?;

    tracing::debug!(
        tool = %program,
        status = ?output.status.code(),
        "diff tool finished"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.is_empty() {
        Ok(stdout.into_owned())
    } else {
        Ok(format!("{}{}", stdout, stderr))
    }
}

fn builtin_from_files(generated: &Path, tracked: &Path) -> String {
    let read = |path: &Path| {
        std::fs::read(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "cannot read file for diff");
            format!("diff unavailable: failed to read {}: {}\n", path.display(), e)
        })
    };
    let (generated_text, tracked_text) = match (read(generated), read(tracked)) {
        (Ok(g), Ok(t)) => (g, t),
        (Err(msg), _) | (_, Err(msg)) => return msg,
    };
    first_difference(
        &String::from_utf8_lossy(&generated_text),
        &String::from_utf8_lossy(&tracked_text),
    )
}

/// Summarise the first line where `generated` and `tracked` diverge.
pub fn first_difference(generated: &str, tracked: &str) -> String {
    let mut generated_lines = generated.split_inclusive('\n');
    let mut tracked_lines = tracked.split_inclusive('\n');
    let mut line_no = 1;

    loop {
        match (generated_lines.next(), tracked_lines.next()) {
            (None, None) => return "files are identical".to_string(),
            (g, t) if g == t => line_no += 1,
            (g, t) => {
                return format!(
                    "first difference at line {}:\n- {}\n+ {}\n",
                    line_no,
                    describe_line(t),
                    describe_line(g)
                );
            }
        }
    }
}

fn describe_line(line: Option<&str>) -> String {
    match line {
        Some(text) if text.ends_with('\n') => format!("{:?}", text.trim_end_matches('\n')),
        Some(text) => format!("{:?} (no newline at end of file)", text),
        None => "<end of file>".to_string(),
    }
}
