//! Check mode: compare rendered artifacts with their tracked copies.

use super::Rendered;
use super::diff::DiffTool;
use crate::error::{Result, TplError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Options for [`super::Generator::check`].
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub diff_tool: DiffTool,
    /// Report every mismatch instead of stopping at the first one.
    pub keep_going: bool,
    /// Where the comparison copies are created. System temp dir when unset.
    pub scratch_parent: Option<PathBuf>,
}

/// Why a tracked artifact is out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// The tracked file exists but its bytes differ.
    Differs,
    /// The tracked file does not exist.
    Missing,
}

/// One out-of-sync artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub name: String,
    pub output: PathBuf,
    pub kind: MismatchKind,
    /// Operator-facing diff text; empty for missing files.
    pub diff: String,
}

/// Outcome of a check run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of artifacts compared before the run finished or stopped.
    pub checked: usize,
    pub mismatches: Vec<Mismatch>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Write every rendered artifact into a scoped temp dir and compare it with
/// the tracked output. The temp dir is removed when this returns, on every path.
pub(super) fn compare(rendered: &[Rendered], options: &CheckOptions) -> Result<CheckReport> {
    let parent = options
        .scratch_parent
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let scratch = TempDir::with_prefix_in("tplsync-check-", &parent)
        .map_err(|e| TplError::io("failed to create temporary directory", &parent, e))?;
    tracing::debug!(path = %scratch.path().display(), "created comparison directory");

    let mut report = CheckReport::default();

    for (idx, artifact) in rendered.iter().enumerate() {
        let generated = scratch_path(scratch.path(), idx, &artifact.output);
        fs::write(&generated, &artifact.text)
            .map_err(|e| TplError::io("failed to write comparison copy", &generated, e))?;

        report.checked += 1;

        let Some(kind) = compare_one(&generated, &artifact.output)? else {
            tracing::info!(artifact = %artifact.name, "in sync");
            continue;
        };

        let diff = match kind {
            MismatchKind::Differs => options.diff_tool.describe(&generated, &artifact.output),
            MismatchKind::Missing => String::new(),
        };
        tracing::info!(artifact = %artifact.name, kind = ?kind, "out of sync");

        report.mismatches.push(Mismatch {
            name: artifact.name.clone(),
            output: artifact.output.clone(),
            kind,
            diff,
        });

        if !options.keep_going {
            break;
        }
    }

    Ok(report)
}

/// `None` when the tracked file is byte-identical to the generated copy.
fn compare_one(generated: &Path, tracked: &Path) -> Result<Option<MismatchKind>> {
    let tracked_bytes = match fs::read(tracked) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Some(MismatchKind::Missing)),
        Err(e) => return Err(TplError::io("failed to read tracked artifact", tracked, e)),
    };
    let generated_bytes = fs::read(generated)
        .map_err(|e| TplError::io("failed to read comparison copy", generated, e))?;

    if tracked_bytes == generated_bytes {
        Ok(None)
    } else {
        Ok(Some(MismatchKind::Differs))
    }
}

/// Index-prefixed so two outputs with the same file name never collide.
fn scratch_path(scratch: &Path, idx: usize, output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "artifact".to_string());
    scratch.join(format!("{}-{}", idx, name))
}
