//! Directory hashing

use crate::concurrency::IoLimiter;
use crate::error::FingerprintError;
use crate::ignore::IgnoreMatcher;
use crate::options::NormalizedOptions;
use crate::tree::file::hash_file_at;
use crate::tree::hasher::{compute_entries_hash, HashAlgorithm};
use crate::tree::path;
use crate::types::{DebugInfo, HashOutcome, HashResult, SourceKind};
use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Kind of a listed directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One immediate child of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// NFC-normalized entry name
    pub name: String,
    /// Project-relative id of the entry
    pub id: String,
    pub kind: EntryKind,
    /// On-disk location
    pub location: PathBuf,
}

/// Order children by name, byte-wise on the normalized name (no locale).
pub fn sort_entries(entries: &mut [ChildEntry]) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Hash a directory subtree.
///
/// Returns `Excluded` when the directory matches an ignore rule (nothing is
/// listed) or when every child is excluded; an all-excluded directory is
/// indistinguishable from a missing one. The limiter is shared with every
/// recursive call; a slot is held only while listing, never while waiting on
/// children.
pub fn hash_dir<'a>(
    dir_id: &'a str,
    options: &'a NormalizedOptions,
    limiter: &'a IoLimiter,
    depth: usize,
) -> BoxFuture<'a, Result<HashOutcome, FingerprintError>> {
    let location = options.resolve(dir_id);
    hash_dir_at(dir_id.to_string(), location, options, limiter, depth)
}

fn hash_dir_at<'a>(
    dir_id: String,
    location: PathBuf,
    options: &'a NormalizedOptions,
    limiter: &'a IoLimiter,
    depth: usize,
) -> BoxFuture<'a, Result<HashOutcome, FingerprintError>> {
    async move {
        if options.ignore.is_ignored_dir(&dir_id) {
            trace!(path = %dir_id, depth, "Excluded directory");
            return Ok(HashOutcome::Excluded);
        }

        let mut entries = list_children(&dir_id, &location, &options.ignore, limiter).await?;
        sort_entries(&mut entries);

        let outcomes = try_join_all(entries.into_iter().map(move |entry| async move {
            match entry.kind {
                EntryKind::Dir => {
                    hash_dir_at(entry.id, entry.location, options, limiter, depth + 1).await
                }
                EntryKind::File => {
                    hash_file_at(&entry.id, &entry.location, options, limiter).await
                }
            }
        }))
        .await?;

        let children: Vec<HashResult> = outcomes
            .into_iter()
            .filter_map(HashOutcome::into_result)
            .collect();

        Ok(combine_children(
            dir_id,
            children,
            options.hash_algorithm,
            options.debug,
        ))
    }
    .boxed()
}

/// Fold already-sorted child results into the directory result.
pub fn combine_children(
    dir_id: String,
    children: Vec<HashResult>,
    algorithm: HashAlgorithm,
    debug: bool,
) -> HashOutcome {
    if children.is_empty() {
        trace!(path = %dir_id, "Directory has no hashed children");
        return HashOutcome::Excluded;
    }

    let hex = compute_entries_hash(
        algorithm,
        children.iter().map(|c| (c.id.as_str(), c.hex.as_str())),
    );

    let debug_info = debug.then(|| DebugInfo::Dir {
        path: dir_id.clone(),
        hash: hex.clone(),
        children: children.into_iter().filter_map(|c| c.debug_info).collect(),
    });

    HashOutcome::Hashed(HashResult {
        kind: SourceKind::Dir,
        id: dir_id,
        hex,
        debug_info,
    })
}

/// List files and subdirectories; symlinks and special files are skipped.
///
/// A name that is not valid UTF-8 is an error unless the ignore rules skip it,
/// since its lossy form could collide with another entry's id.
async fn list_children(
    dir_id: &str,
    location: &Path,
    ignore: &IgnoreMatcher,
    limiter: &IoLimiter,
) -> Result<Vec<ChildEntry>, FingerprintError> {
    let _permit = limiter.acquire().await?;

    let mut read_dir = tokio::fs::read_dir(location)
        .await
        .map_err(|e| FingerprintError::io(dir_id, e))?;

    let mut entries = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .map_err(|e| FingerprintError::io(dir_id, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| FingerprintError::io(dir_id, e))?;
        let kind = if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            continue;
        };

        let name = match entry.file_name().into_string() {
            Ok(name) => path::normalize_name(&name),
            Err(raw) => {
                let lossy_id = path::join_id(dir_id, &raw.to_string_lossy());
                let ignored = match kind {
                    EntryKind::Dir => ignore.is_ignored_dir(&lossy_id),
                    EntryKind::File => ignore.is_ignored_path(&lossy_id),
                };
                if ignored {
                    trace!(path = %lossy_id, "Excluded entry with non UTF-8 name");
                    continue;
                }
                return Err(FingerprintError::io(
                    lossy_id,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "file name is not valid UTF-8",
                    ),
                ));
            }
        };
        entries.push(ChildEntry {
            id: path::join_id(dir_id, &name),
            name,
            kind,
            location: entry.path(),
        });
    }

    Ok(entries)
}
