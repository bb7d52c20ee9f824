//! Config struct definition and default implementation.

use crate::generate::Artifact;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = "tplsync.yaml";

/// Directory holding templates in the default layout.
pub const DEFAULT_TEMPLATE_DIR: &str = "template";

/// Environment block file in the default layout.
pub const DEFAULT_ENV_FILE: &str = "template/env.yml";

/// Configuration for a generation run.
///
/// All paths are relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The `env:` block supplying template variables.
    pub env_file: PathBuf,

    /// Generated files, rendered and checked in this order.
    pub artifacts: Vec<Artifact>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
            artifacts: default_artifacts(),
        }
    }
}

fn default_env_file() -> PathBuf {
    PathBuf::from(DEFAULT_ENV_FILE)
}

/// The CI workflow is the env block followed by the workflow body, copied
/// verbatim; the README is rendered against the env block.
fn default_artifacts() -> Vec<Artifact> {
    let template = PathBuf::from(DEFAULT_TEMPLATE_DIR);
    vec![
        Artifact::new(
            "workflow",
            [default_env_file(), template.join("build-nginx-ech.yml")],
            ".github/workflows/build-nginx-ech.yml",
            false,
        ),
        Artifact::new("readme", [template.join("README.md")], "README.md", true),
    ]
}
