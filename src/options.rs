//! Engine options
//!
//! `Options` is what callers build (directly or from `FingerprintConfig`).
//! `NormalizedOptions` is the compiled form used during a run: canonical
//! project root, compiled ignore rules and shared transform state. It is
//! built once per `create_fingerprint` call and never cached globally.

use crate::config::FingerprintConfig;
use crate::error::FingerprintError;
use crate::ignore::{IgnoreMatcher, DEFAULT_IGNORE_PATHS};
use crate::transform::{FileHook, HeaderNormalizer, HookTransform, TransformPipeline};
use crate::tree::hasher::HashAlgorithm;
use crate::tree::path;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default I/O concurrency: one slot per available CPU
pub fn default_concurrent_io_limit() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Caller-facing options
#[derive(Clone)]
pub struct Options {
    /// Directory that file and dir sources are relative to
    pub project_root: PathBuf,
    pub hash_algorithm: HashAlgorithm,
    /// Ordered glob patterns; `!` negates
    pub ignore_paths: Vec<String>,
    pub concurrent_io_limit: usize,
    pub header_normalizer: Option<HeaderNormalizer>,
    pub file_hook: Option<Arc<dyn FileHook>>,
    /// Record transform diagnostics and attach `DebugInfo` trees
    pub debug: bool,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("project_root", &self.project_root)
            .field("hash_algorithm", &self.hash_algorithm)
            .field("ignore_paths", &self.ignore_paths)
            .field("concurrent_io_limit", &self.concurrent_io_limit)
            .field("header_normalizer", &self.header_normalizer.is_some())
            .field("file_hook", &self.file_hook.is_some())
            .field("debug", &self.debug)
            .finish()
    }
}

impl Options {
    /// Defaults: sha1, built-in ignore list, one I/O slot per CPU, no transforms
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            hash_algorithm: HashAlgorithm::default(),
            ignore_paths: DEFAULT_IGNORE_PATHS.iter().map(|p| (*p).to_string()).collect(),
            concurrent_io_limit: default_concurrent_io_limit(),
            header_normalizer: None,
            file_hook: None,
            debug: false,
        }
    }

    /// Options described by a loaded configuration
    pub fn from_config(project_root: impl Into<PathBuf>, config: &FingerprintConfig) -> Self {
        let header_normalizer = config
            .enable_header_normalizer
            .then(|| HeaderNormalizer::react().with_window(config.header_window_bytes));
        Self {
            project_root: project_root.into(),
            hash_algorithm: config.hash_algorithm,
            ignore_paths: config.effective_ignore_paths(),
            concurrent_io_limit: config.concurrent_io_limit,
            header_normalizer,
            file_hook: None,
            debug: config.debug,
        }
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    /// Replace the ignore list
    pub fn with_ignore_paths<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_paths = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_concurrent_io_limit(mut self, limit: usize) -> Self {
        self.concurrent_io_limit = limit;
        self
    }

    pub fn with_header_normalizer(mut self, normalizer: HeaderNormalizer) -> Self {
        self.header_normalizer = Some(normalizer);
        self
    }

    pub fn with_file_hook(mut self, hook: Arc<dyn FileHook>) -> Self {
        self.file_hook = Some(hook);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Compiled options for one fingerprint run
pub struct NormalizedOptions {
    pub project_root: PathBuf,
    pub hash_algorithm: HashAlgorithm,
    pub ignore: IgnoreMatcher,
    pub concurrent_io_limit: usize,
    pub header_normalizer: Option<Arc<HeaderNormalizer>>,
    pub file_hook: Option<Arc<dyn FileHook>>,
    pub debug: bool,
}

impl NormalizedOptions {
    pub fn new(options: &Options) -> Result<Self, FingerprintError> {
        if options.concurrent_io_limit == 0 {
            return Err(FingerprintError::Config(
                "concurrent_io_limit must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            project_root: path::canonicalize_root(&options.project_root)?,
            hash_algorithm: options.hash_algorithm,
            ignore: IgnoreMatcher::new(&options.ignore_paths)?,
            concurrent_io_limit: options.concurrent_io_limit,
            header_normalizer: options.header_normalizer.clone().map(Arc::new),
            file_hook: options.file_hook.clone(),
            debug: options.debug,
        })
    }

    /// Filesystem location of a project-relative id
    pub fn resolve(&self, id: &str) -> PathBuf {
        path::resolve(&self.project_root, id)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Transforms for one file: header normalizer first (when it applies), then the hook
    pub fn pipeline_for(&self, file_id: &str) -> TransformPipeline {
        let mut pipeline = TransformPipeline::new();
        if let Some(normalizer) = &self.header_normalizer {
            if normalizer.applies_to(file_id) {
                pipeline.push_stage(Box::new(normalizer.stream()));
            }
        }
        if let Some(hook) = &self.file_hook {
            pipeline.push_stage(Box::new(HookTransform::new(
                Arc::clone(hook),
                file_id,
                self.debug,
            )));
        }
        pipeline
    }
}
