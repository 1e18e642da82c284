//! Error types for the fingerprinting engine.

use thiserror::Error;

/// Errors raised while computing a fingerprint
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("Unsupported source type: {0}")]
    UnsupportedSourceType(String),

    #[error("Invalid source list: {0}")]
    InvalidSources(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Transform failed for {path}: {source}")]
    Transform {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Unknown hash algorithm: {0}")]
    InvalidHashAlgorithm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O limiter closed")]
    LimiterClosed,
}

impl FingerprintError {
    pub(crate) fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        FingerprintError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for FingerprintError {
    fn from(err: config::ConfigError) -> Self {
        FingerprintError::Config(err.to_string())
    }
}
