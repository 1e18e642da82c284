//! Fingerprint: Deterministic Project Fingerprinting
//!
//! Reduces a declared set of sources (inline contents, files and directory
//! trees) to one hex digest. Directory hashes are Merkle-style: each node
//! digest is derived from its sorted children's ids and digests, so any
//! content change below a source changes that source and the aggregate.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod ignore;
pub mod logging;
pub mod options;
pub mod transform;
pub mod tree;
pub mod types;

pub use config::{ConfigLoader, FingerprintConfig};
pub use error::FingerprintError;
pub use fingerprint::{create_fingerprint, create_fingerprint_with, parse_sources};
pub use options::{NormalizedOptions, Options};
pub use transform::{FileHook, HeaderNormalizer, HookSource};
pub use tree::hasher::HashAlgorithm;
pub use types::{DebugInfo, Fingerprint, FingerprintSource, HashOutcome, HashResult, HashSource};
