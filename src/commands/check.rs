//! Implementation of check mode.

use super::Outcome;
use crate::error::{Result, TplError};
use crate::generate::{CheckOptions, CheckReport, Generator, MismatchKind};
use std::io::{self, Write};
use std::path::Path;

/// Compare generated artifacts with the tracked files.
///
/// Diffs go to stdout and the summary to stderr, like `diff` itself.
pub fn cmd_check(generator: &Generator, options: &CheckOptions) -> Result<Outcome> {
    let report = generator.check(options)?;

    let stdout = io::stdout();
    print_diffs(&report, &mut stdout.lock())
        .map_err(|e| TplError::io("failed to write report", "<stdout>", e))?;

    let summary = summarize(&report, generator.root());
    if report.is_clean() {
        tracing::info!("{}", summary);
        Ok(Outcome::Success)
    } else {
        eprintln!("{}", summary);
        Ok(Outcome::OutOfSync)
    }
}

fn print_diffs<W: Write>(report: &CheckReport, out: &mut W) -> io::Result<()> {
    for mismatch in &report.mismatches {
        if !mismatch.diff.is_empty() {
            out.write_all(mismatch.diff.as_bytes())?;
            if !mismatch.diff.ends_with('\n') {
                writeln!(out)?;
            }
        }
    }
    out.flush()
}

fn summarize(report: &CheckReport, root: &Path) -> String {
    if report.is_clean() {
        return format!("{} generated file(s) up to date", report.checked);
    }

    let mut lines = Vec::with_capacity(report.mismatches.len() + 1);
    for mismatch in &report.mismatches {
        let path = mismatch
            .output
            .strip_prefix(root)
            .unwrap_or(&mismatch.output);
        let reason = match mismatch.kind {
            MismatchKind::Differs => "differs from its template",
            MismatchKind::Missing => "is missing",
        };
        lines.push(format!("{} ({}) {}", path.display(), mismatch.name, reason));
    }
    lines.push("Fix: run `tplsync write` and commit the result.".to_string());
    lines.join("\n")
}
