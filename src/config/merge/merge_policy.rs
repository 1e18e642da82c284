//! Merge rules: defaults, override order, conflict handling.

use crate::options::default_concurrent_io_limit;
use crate::transform::header_imports::DEFAULT_WINDOW_BYTES;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};

/// Prefix of environment overrides, e.g. `FINGERPRINT_HASH_ALGORITHM=sha256`
pub const ENV_PREFIX: &str = "FINGERPRINT";

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("hash_algorithm", "sha1")?
        .set_default("default_ignore_paths", true)?
        .set_default("ignore_paths", Vec::<String>::new())?
        .set_default("concurrent_io_limit", default_concurrent_io_limit() as i64)?
        .set_default("enable_header_normalizer", false)?
        .set_default("header_window_bytes", DEFAULT_WINDOW_BYTES as i64)?
        .set_default("debug", false)
}

/// Environment variables override every file source.
/// Nested keys use `__` (`FINGERPRINT_LOGGING__LEVEL=debug`); `ignore_paths` is comma separated.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("ignore_paths")
}
