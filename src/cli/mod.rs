//! CLI argument parsing for tplsync.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the argument structure; actual implementations
//! are in the `commands` module.

use crate::generate::diff::DEFAULT_DIFF_TOOL;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// tplsync: render derived files from `{{placeholder}}` templates.
///
/// Values come from a single `env:` block. In check mode (the default) the
/// rendered files are compared against the checked-in copies; in write mode
/// the checked-in copies are regenerated.
#[derive(Parser, Debug)]
#[command(name = "tplsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// check compares generated files; write overwrites outputs.
    #[arg(value_enum, default_value_t = Mode::Check)]
    pub mode: Mode,

    /// Repository root (default: nearest ancestor with tplsync.yaml or .git).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Config file, relative to the repository root (default: tplsync.yaml if present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Command used to show differences in check mode, or "builtin".
    #[arg(long, env = "DIFF_TOOL", default_value = DEFAULT_DIFF_TOOL)]
    pub diff_tool: String,

    /// Report every out-of-sync file instead of stopping at the first.
    #[arg(long)]
    pub all: bool,

    /// Directory in which check mode creates its comparison copies
    /// (default: the system temp dir).
    #[arg(long, env = "TPLSYNC_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What to do with the rendered artifacts.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Compare against the tracked files without modifying them.
    Check,
    /// Overwrite the tracked files.
    Write,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
