//! Artifact generation and verification.
//!
//! Both modes run through [`Generator::render_all`]:
//!
//! - **write**: every rendered artifact atomically replaces its output file.
//! - **check**: rendered artifacts are written to a scoped temporary
//!   directory and compared byte-for-byte with the tracked outputs, which
//!   are never modified.

mod check;
pub mod diff;

#[cfg(test)]
mod tests;

pub use check::{CheckOptions, CheckReport, Mismatch, MismatchKind};
pub use diff::DiffTool;

use crate::env_block::{self, VariableMapping};
use crate::error::{Result, TplError};
use crate::fs::atomic_write_file;
use crate::template::Template;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One generated file and the sources it is assembled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Short label used in logs and reports.
    pub name: String,

    /// Source files, concatenated in order. Relative to the repository root.
    pub sources: Vec<PathBuf>,

    /// Generated file, relative to the repository root.
    pub output: PathBuf,

    /// Substitute `{{placeholders}}` in the sources. When false the sources
    /// are copied verbatim, which keeps `${{ ... }}` workflow expressions intact.
    #[serde(default = "default_substitute")]
    pub substitute: bool,
}

fn default_substitute() -> bool {
    true
}

impl Artifact {
    pub fn new(
        name: impl Into<String>,
        sources: impl IntoIterator<Item = impl Into<PathBuf>>,
        output: impl Into<PathBuf>,
        substitute: bool,
    ) -> Self {
        Self {
            name: name.into(),
            sources: sources.into_iter().map(Into::into).collect(),
            output: output.into(),
            substitute,
        }
    }
}

/// The text an artifact renders to, along with where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub name: String,
    /// Absolute (root-joined) output path.
    pub output: PathBuf,
    pub text: String,
}

/// Renders a fixed set of artifacts against one environment file.
#[derive(Debug, Clone)]
pub struct Generator {
    root: PathBuf,
    env_file: PathBuf,
    artifacts: Vec<Artifact>,
}

impl Generator {
    /// `env_file` and artifact paths are interpreted relative to `root`.
    pub fn new(root: impl Into<PathBuf>, env_file: impl Into<PathBuf>, artifacts: Vec<Artifact>) -> Self {
        Self {
            root: root.into(),
            env_file: env_file.into(),
            artifacts,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parse the environment block and render every artifact.
    ///
    /// All-or-nothing: the first parse, read or render failure aborts the
    /// whole run, so no caller ever sees a partial set.
    pub fn render_all(&self) -> Result<Vec<Rendered>> {
        let vars = env_block::parse_file(self.root.join(&self.env_file))?;

        self.artifacts
            .iter()
            .map(|artifact| -> Result<Rendered> {
                let text = self.render_artifact(artifact, &vars)?;
                tracing::debug!(artifact = %artifact.name, bytes = text.len(), "rendered artifact");
                Ok(Rendered {
                    name: artifact.name.clone(),
                    output: self.root.join(&artifact.output),
                    text,
                })
            })
            .collect()
    }

    fn render_artifact(&self, artifact: &Artifact, vars: &VariableMapping) -> Result<String> {
        let mut text = String::new();
        for source in &artifact.sources {
            let path = self.root.join(source);
            if artifact.substitute {
                let template = Template::load(&path)?;
                tracing::debug!(
                    source = %source.display(),
                    variables = ?template.variables(),
                    "rendering template"
                );
                let rendered = template
                    .render(vars)
                    .map_err(|e| TplError::from_template(e, source))?;
                text.push_str(&rendered);
            } else {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| TplError::io("failed to read source", &path, e))?;
                text.push_str(&raw);
            }
        }
        Ok(text)
    }

    /// Render every artifact and overwrite its output file.
    ///
    /// Returns the written paths in artifact order. Nothing is written if
    /// rendering fails.
    pub fn write(&self) -> Result<Vec<PathBuf>> {
        let rendered = self.render_all()?;
        let mut written = Vec::with_capacity(rendered.len());

        for artifact in rendered {
            atomic_write_file(&artifact.output, &artifact.text)?;
            tracing::info!(artifact = %artifact.name, path = %artifact.output.display(), "wrote artifact");
            written.push(artifact.output);
        }

        Ok(written)
    }

    /// Verify every tracked output matches what [`Generator::write`] would produce.
    pub fn check(&self, options: &CheckOptions) -> Result<CheckReport> {
        let rendered = self.render_all()?;
        check::compare(&rendered, options)
    }
}
