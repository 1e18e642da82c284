//! File hashing

use crate::concurrency::IoLimiter;
use crate::error::FingerprintError;
use crate::options::NormalizedOptions;
use crate::types::{DebugInfo, HashOutcome, HashResult, SourceKind};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::trace;

/// Read size for streaming file contents
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Hash one file identified by its project-relative id.
///
/// Excluded files return `HashOutcome::Excluded` without touching the
/// filesystem. Metadata (mtime, permissions) never reaches the digest.
pub async fn hash_file(
    file_id: &str,
    options: &NormalizedOptions,
    limiter: &IoLimiter,
) -> Result<HashOutcome, FingerprintError> {
    let location = options.resolve(file_id);
    hash_file_at(file_id, &location, options, limiter).await
}

/// Hash a file whose on-disk location is already known (directory listings).
pub(crate) async fn hash_file_at(
    file_id: &str,
    location: &Path,
    options: &NormalizedOptions,
    limiter: &IoLimiter,
) -> Result<HashOutcome, FingerprintError> {
    if options.ignore.is_ignored_path(file_id) {
        trace!(path = file_id, "Excluded file");
        return Ok(HashOutcome::Excluded);
    }

    let permit = limiter.acquire().await?;

    let mut file = File::open(location)
        .await
        .map_err(|e| FingerprintError::io(file_id, e))?;
    let mut digester = options.hash_algorithm.digester();
    let mut pipeline = options.pipeline_for(file_id);
    let transform_error = |e: anyhow::Error| FingerprintError::Transform {
        path: file_id.to_string(),
        source: e,
    };

    let mut buffer = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let read = file
            .read(&mut buffer)
            .await
            .map_err(|e| FingerprintError::io(file_id, e))?;
        if read == 0 {
            break;
        }
        let chunk = &buffer[..read];
        if pipeline.is_empty() {
            digester.update(chunk);
        } else {
            let transformed = pipeline.transform(chunk).map_err(transform_error)?;
            digester.update(&transformed);
        }
    }
    if !pipeline.is_empty() {
        let tail = pipeline.finish().map_err(transform_error)?;
        digester.update(&tail);
    }

    drop(permit);

    let hex = digester.finalize_hex();
    trace!(path = file_id, hash = %hex, "Hashed file");

    let debug_info = options.debug.then(|| DebugInfo::File {
        path: file_id.to_string(),
        hash: hex.clone(),
        is_transformed: pipeline.is_transformed(),
    });

    Ok(HashOutcome::Hashed(HashResult {
        kind: SourceKind::File,
        id: file_id.to_string(),
        hex,
        debug_info,
    }))
}
