//! Atomic whole-file writes for generated artifacts.
//!
//! Generated files are overwritten wholesale, never partially updated:
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Atomically replace the target file
//!
//! On crash a `.{filename}.tmp` file may remain next to the target.

use crate::error::{Result, TplError};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .map_err(|e| TplError::io("failed to create directory", parent, e))?;
    }

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content)?;
    atomic_replace(&temp_path, path)?;

    Ok(())
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Temporary sibling path: `.{filename}.tmp`.
fn generate_temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            TplError::Config(format!("invalid output path '{}'", target.display()))
        })?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).map_err(|e| TplError::io("failed to create temporary file", path, e))?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(TplError::io("failed to write temporary file", path, e));
    }

    Ok(())
}

#[cfg(unix)]
fn atomic_replace(source: &Path, target: &Path) -> Result<()> {
    // rename(2) replaces the destination atomically on the same filesystem.
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        TplError::io("failed to replace", target, e)
    })?;

    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}

#[cfg(not(unix))]
fn atomic_replace(source: &Path, target: &Path) -> Result<()> {
    if fs::rename(source, target).is_ok() {
        return Ok(());
    }

    // Some platforms refuse to rename over an existing file.
    let replaced = fs::remove_file(target).and_then(|()| fs::rename(source, target));
    replaced.map_err(|e| {
        let _ = fs::remove_file(source);
        TplError::io("failed to replace", target, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("README.md");

        atomic_write(&file_path, b"# hello\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# hello\n");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("README.md");
        fs::write(&file_path, "original content that is longer").unwrap();

        atomic_write(&file_path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir
            .path()
            .join(".github")
            .join("workflows")
            .join("build.yml");

        atomic_write_file(&file_path, "on: push\n").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "on: push\n");
    }

    #[test]
    fn test_atomic_write_temp_file_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("out.txt");

        atomic_write(&file_path, b"content").unwrap();

        assert!(!temp_dir.path().join(".out.txt.tmp").exists());
    }

    #[test]
    fn test_atomic_write_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");

        atomic_write(&file_path, b"").unwrap();

        assert!(fs::read(&file_path).unwrap().is_empty());
    }

    #[test]
    fn test_atomic_write_into_file_parent_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = atomic_write(blocker.join("out.txt"), b"x").unwrap_err();
        assert!(matches!(err, TplError::Io { .. }));
    }

    #[test]
    fn test_generate_temp_path() {
        let temp = generate_temp_path(Path::new("/some/path/file.txt")).unwrap();
        assert_eq!(temp, Path::new("/some/path/.file.txt.tmp"));
    }
}
