//! Config loading, discovery and validation.

use super::model::{CONFIG_FILE_NAME, Config};
use crate::error::{Result, TplError};
use std::collections::HashSet;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|e| TplError::io("failed to read config file", path, e))?;

        Self::from_yaml(&content).map_err(|e| match e {
            TplError::Config(msg) => TplError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| TplError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to a YAML string.
    #[cfg(test)]
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| TplError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Resolve the config for a repository.
    ///
    /// An explicit path must exist. Otherwise `tplsync.yaml` at `root` is
    /// used when present, and the built-in defaults when not.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let path = root.join(path);
            tracing::debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::load(candidate)
        } else {
            tracing::debug!("no config file, using built-in layout");
            Ok(Self::default())
        }
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - at least one artifact
    /// - artifact names are non-empty and unique
    /// - every artifact has at least one source
    /// - output paths are unique
    pub fn validate(&self) -> Result<()> {
        if self.artifacts.is_empty() {
            return Err(TplError::Config(
                "config validation failed: artifacts must not be empty".to_string(),
            ));
        }

        let mut names = HashSet::new();
        let mut outputs = HashSet::new();

        for artifact in &self.artifacts {
            if artifact.name.trim().is_empty() {
                return Err(TplError::Config(
                    "config validation failed: artifact name must be non-empty".to_string(),
                ));
            }
            if !names.insert(artifact.name.as_str()) {
                return Err(TplError::Config(format!(
                    "config validation failed: duplicate artifact name '{}'",
                    artifact.name
                )));
            }
            if artifact.sources.is_empty() {
                return Err(TplError::Config(format!(
                    "config validation failed: artifact '{}' has no sources",
                    artifact.name
                )));
            }
            if !outputs.insert(artifact.output.as_path()) {
                return Err(TplError::Config(format!(
                    "config validation failed: output '{}' is generated by more than one artifact",
                    artifact.output.display()
                )));
            }
        }

        Ok(())
    }
}
