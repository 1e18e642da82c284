//! Configuration System
//!
//! Layered configuration for the fingerprinting engine: built-in defaults,
//! a global user file, a per-project file, `FINGERPRINT_*` environment
//! variables and finally the project's `.fingerprintignore`.

use crate::error::FingerprintError;
use crate::ignore::{IgnoreMatcher, DEFAULT_IGNORE_PATHS};
use crate::logging::LoggingConfig;
use crate::options::default_concurrent_io_limit;
use crate::transform::header_imports::DEFAULT_WINDOW_BYTES;
use crate::tree::hasher::HashAlgorithm;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use merge::merge_policy::ENV_PREFIX;
pub use sources::global_file::global_config_path;
pub use sources::project_file::{project_config_path, PROJECT_CONFIG_FILE};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintConfig {
    /// Digest used for every node
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Prepend the built-in native build output patterns
    #[serde(default = "default_true")]
    pub default_ignore_paths: bool,

    /// Additional ignore patterns, in evaluation order
    #[serde(default)]
    pub ignore_paths: Vec<String>,

    /// Maximum simultaneous file reads / directory listings
    #[serde(default = "default_concurrent_io_limit")]
    pub concurrent_io_limit: usize,

    /// Rewrite quoted framework header imports before hashing
    #[serde(default)]
    pub enable_header_normalizer: bool,

    /// Bytes at the start of each file inspected by the header normalizer
    #[serde(default = "default_header_window_bytes")]
    pub header_window_bytes: usize,

    /// Attach debug info to fingerprint sources
    #[serde(default)]
    pub debug: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

fn default_header_window_bytes() -> usize {
    DEFAULT_WINDOW_BYTES
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::default(),
            default_ignore_paths: true,
            ignore_paths: Vec::new(),
            concurrent_io_limit: default_concurrent_io_limit(),
            enable_header_normalizer: false,
            header_window_bytes: default_header_window_bytes(),
            debug: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl FingerprintConfig {
    /// Ignore patterns in evaluation order: built-in defaults first, then configured ones
    pub fn effective_ignore_paths(&self) -> Vec<String> {
        let mut patterns: Vec<String> = if self.default_ignore_paths {
            DEFAULT_IGNORE_PATHS.iter().map(|p| (*p).to_string()).collect()
        } else {
            Vec::new()
        };
        patterns.extend(self.ignore_paths.iter().cloned());
        patterns
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.concurrent_io_limit == 0 {
            errors.push("concurrent_io_limit must be at least 1".to_string());
        }
        if self.enable_header_normalizer && self.header_window_bytes == 0 {
            errors.push("header_window_bytes must be at least 1".to_string());
        }
        if let Err(e) = IgnoreMatcher::new(&self.effective_ignore_paths()) {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and convert the error list into a single error
    pub fn ensure_valid(&self) -> Result<(), FingerprintError> {
        self.validate().map_err(|errors| {
            FingerprintError::Config(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            ))
        })
    }
}
