//! Repository root resolution for tplsync.
//!
//! Every path in the config (templates, env file, outputs) is relative to the
//! repository root, so commands work the same from any subdirectory.

use crate::config::CONFIG_FILE_NAME;
use crate::error::{Result, TplError};
use std::env;
use std::path::{Path, PathBuf};

/// Resolved location of the repository being generated.
#[derive(Debug, Clone)]
pub struct RepoContext {
    /// Absolute path to the repository root.
    pub root: PathBuf,
}

impl RepoContext {
    /// Resolve the repository root.
    ///
    /// An explicit `--root` wins. Otherwise the nearest ancestor of the
    /// current directory holding `tplsync.yaml` or `.git` is used, falling
    /// back to the current directory itself.
    pub fn resolve(explicit_root: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir()
            .map_err(|e| TplError::io("failed to get current directory", ".", e))?;

        match explicit_root {
            Some(root) => Self::from_explicit(&cwd.join(root)),
            None => Ok(Self::resolve_from(&cwd)),
        }
    }

    /// Walk up from `start` looking for a repository marker.
    pub fn resolve_from<P: AsRef<Path>>(start: P) -> Self {
        let start = start.as_ref();
        let root = start
            .ancestors()
            .find(|dir| is_repo_root(dir))
            .unwrap_or(start)
            .to_path_buf();

        tracing::debug!(root = %root.display(), "resolved repository root");
        Self { root }
    }

    fn from_explicit(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(TplError::Config(format!(
                "repository root '{}' is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }
}

fn is_repo_root(dir: &Path) -> bool {
    dir.join(CONFIG_FILE_NAME).is_file() || dir.join(".git").exists()
}
