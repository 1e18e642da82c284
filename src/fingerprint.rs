//! Source aggregation
//!
//! Every top-level source is hashed concurrently through one shared
//! `IoLimiter`; results are folded into the aggregate digest in declared
//! order. Excluded sources contribute nothing, not even their id.

use crate::concurrency::IoLimiter;
use crate::error::FingerprintError;
use crate::options::{NormalizedOptions, Options};
use crate::transform::hook::transform_contents;
use crate::tree::hasher::{compute_entries_hash, compute_hash};
use crate::tree::{hash_dir, hash_file, path};
use crate::types::{
    DebugInfo, Fingerprint, FingerprintSource, HashOutcome, HashResult, HashSource, SourceKind,
};
use futures::future::try_join_all;
use std::borrow::Cow;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Compute the fingerprint of `sources`.
///
/// Matchers, transforms and the limiter are built fresh for this call. The
/// first I/O or transform failure anywhere rejects the whole call.
#[instrument(skip_all, fields(root = %options.project_root.display(), sources = sources.len()))]
pub async fn create_fingerprint(
    sources: Vec<HashSource>,
    options: &Options,
) -> Result<Fingerprint, FingerprintError> {
    let start = Instant::now();
    let normalized = NormalizedOptions::new(options)?;
    let limiter = IoLimiter::new(normalized.concurrent_io_limit);

    let fingerprint = match create_fingerprint_with(sources, &normalized, &limiter).await {
        Ok(fingerprint) => fingerprint,
        Err(e) => {
            error!("Fingerprint failed: {}", e);
            return Err(e);
        }
    };

    info!(
        source_count = fingerprint.sources.len(),
        hashed_count = fingerprint.hashed_sources().count(),
        hash = %fingerprint.hash,
        algorithm = %normalized.hash_algorithm,
        peak_io = limiter.peak_in_flight(),
        duration_ms = start.elapsed().as_millis(),
        "Fingerprint completed"
    );

    Ok(fingerprint)
}

/// Compute a fingerprint with caller-provided compiled options and limiter.
pub async fn create_fingerprint_with(
    sources: Vec<HashSource>,
    options: &NormalizedOptions,
    limiter: &IoLimiter,
) -> Result<Fingerprint, FingerprintError> {
    let fingerprint_sources = try_join_all(
        sources
            .into_iter()
            .map(|source| create_fingerprint_source(source, options, limiter)),
    )
    .await?;

    let hash = compute_entries_hash(
        options.hash_algorithm,
        fingerprint_sources.iter().filter_map(|s| {
            s.hash
                .as_deref()
                .map(|hash| (s.source.source_id(), hash))
        }),
    );

    Ok(Fingerprint {
        sources: fingerprint_sources,
        hash,
    })
}

/// Hash one top-level source and attach the result.
pub async fn create_fingerprint_source(
    source: HashSource,
    options: &NormalizedOptions,
    limiter: &IoLimiter,
) -> Result<FingerprintSource, FingerprintError> {
    let outcome = match &source {
        HashSource::Contents { id, contents, .. } => {
            HashOutcome::Hashed(hash_contents(id, contents, options)?)
        }
        HashSource::File { file_path, .. } => {
            hash_file(&path::normalize_id(file_path), options, limiter).await?
        }
        HashSource::Dir { file_path, .. } => {
            hash_dir(&path::normalize_id(file_path), options, limiter, 0).await?
        }
    };

    match &outcome {
        HashOutcome::Excluded => {
            debug!(kind = ?source.kind(), id = source.id(), "Source excluded")
        }
        HashOutcome::Hashed(result) => {
            debug!(kind = ?source.kind(), id = source.id(), hash = %result.hex, "Source hashed")
        }
    }

    let (hash, debug_info) = match outcome.into_result() {
        Some(result) => (Some(result.hex), result.debug_info),
        None => (None, None),
    };

    Ok(FingerprintSource {
        source,
        hash,
        debug_info,
    })
}

/// Hash inline contents, running the file hook over them when one is configured.
pub fn hash_contents(
    id: &str,
    contents: &[u8],
    options: &NormalizedOptions,
) -> Result<HashResult, FingerprintError> {
    let (bytes, is_transformed) = match &options.file_hook {
        Some(hook) => {
            let (bytes, changed) = transform_contents(hook.as_ref(), id, contents, options.debug)
                .map_err(|e| FingerprintError::Transform {
                    path: id.to_string(),
                    source: e,
                })?;
            (Cow::Owned(bytes), changed)
        }
        None => (Cow::Borrowed(contents), None),
    };

    let hex = compute_hash(options.hash_algorithm, &bytes);
    let debug_info = options.debug.then(|| DebugInfo::Contents {
        hash: hex.clone(),
        is_transformed,
    });

    Ok(HashResult {
        kind: SourceKind::Contents,
        id: id.to_string(),
        hex,
        debug_info,
    })
}

/// Decode a JSON array of sources.
///
/// Entries whose `type` is not `contents`, `file` or `dir` fail with
/// `UnsupportedSourceType`; other shape errors fail with `InvalidSources`.
pub fn parse_sources(json: &str) -> Result<Vec<HashSource>, FingerprintError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| FingerprintError::InvalidSources(e.to_string()))?;

    values
        .into_iter()
        .map(|value| {
            let tag = value
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or_default()
                .to_string();
            if SourceKind::from_tag(&tag).is_none() {
                return Err(FingerprintError::UnsupportedSourceType(tag));
            }
            serde_json::from_value(value).map_err(|e| FingerprintError::InvalidSources(e.to_string()))
        })
        .collect()
}
