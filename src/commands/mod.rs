//! Command implementations for tplsync.
//!
//! This module resolves the repository, loads the config, builds the single
//! [`Generator`] both modes share, and routes to the mode handler.

mod check;
mod write;

use crate::cli::{Cli, Mode};
use crate::config::Config;
use crate::context::RepoContext;
use crate::error::Result;
use crate::exit_codes;
use crate::generate::{CheckOptions, DiffTool, Generator};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything in sync, or everything written.
    Success,
    /// Check mode found at least one out-of-sync artifact.
    OutOfSync,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => exit_codes::SUCCESS,
            Outcome::OutOfSync => exit_codes::OUT_OF_SYNC,
        }
    }
}

/// Dispatch the parsed command line to its implementation.
pub fn dispatch(cli: Cli) -> Result<Outcome> {
    let ctx = RepoContext::resolve(cli.root.as_deref())?;
    let config = Config::discover(&ctx.root, cli.config.as_deref())?;
    let generator = build_generator(&ctx, config);

    match cli.mode {
        Mode::Write => write::cmd_write(&generator),
        Mode::Check => {
            let options = CheckOptions {
                diff_tool: DiffTool::parse(&cli.diff_tool)?,
                keep_going: cli.all,
                scratch_parent: cli.scratch_dir,
            };
            check::cmd_check(&generator, &options)
        }
    }
}

fn build_generator(ctx: &RepoContext, config: Config) -> Generator {
    tracing::debug!(
        root = %ctx.root.display(),
        env_file = %config.env_file.display(),
        artifacts = config.artifacts.len(),
        "configured generator"
    );
    Generator::new(&ctx.root, config.env_file, config.artifacts)
}
