//! Configuration loader: composes the layered sources into a `FingerprintConfig`.

use super::merge::merge_policy;
use super::sources::{global_file, project_file};
use super::FingerprintConfig;
use crate::error::FingerprintError;
use crate::ignore;
use config::{Config, File};
use std::path::Path;
use tracing::debug;

/// Loads configuration for a project
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    include_global: bool,
    include_env: bool,
    include_ignore_file: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            include_global: true,
            include_env: true,
            include_ignore_file: true,
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip `~/.config/fingerprint/config.toml`
    pub fn without_global(mut self) -> Self {
        self.include_global = false;
        self
    }

    /// Skip `FINGERPRINT_*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.include_env = false;
        self
    }

    /// Skip `.fingerprintignore`
    pub fn without_ignore_file(mut self) -> Self {
        self.include_ignore_file = false;
        self
    }

    /// Load and validate configuration for `project_root`.
    ///
    /// Precedence (lowest to highest): defaults, global file, project file,
    /// environment. Patterns from `.fingerprintignore` are appended last.
    pub fn load(&self, project_root: &Path) -> Result<FingerprintConfig, FingerprintError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        if self.include_global {
            builder = global_file::add_to_builder(builder)?;
        }
        builder = project_file::add_to_builder(builder, project_root)?;
        if self.include_env {
            builder = builder.add_source(merge_policy::environment());
        }

        let mut config: FingerprintConfig = builder.build()?.try_deserialize()?;

        if self.include_ignore_file {
            let extra = ignore::read_ignore_file(project_root);
            if !extra.is_empty() {
                debug!(count = extra.len(), "Loaded patterns from ignore file");
                config.ignore_paths.extend(extra);
            }
        }

        config.ensure_valid()?;
        Ok(config)
    }

    /// Load a single TOML file on top of the defaults
    pub fn load_from_file(path: &Path) -> Result<FingerprintConfig, FingerprintError> {
        let config: FingerprintConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        config.ensure_valid()?;
        Ok(config)
    }

    /// Defaults only
    pub fn defaults() -> Result<FingerprintConfig, FingerprintError> {
        let config: Config = merge_policy::builder_with_defaults()?.build()?;
        Ok(config.try_deserialize()?)
    }
}
