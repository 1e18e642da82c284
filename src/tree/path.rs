//! Path identifiers used in digests
//!
//! Ids are project-relative, use `/` as separator on every platform and are
//! Unicode NFC normalized, so the same tree yields the same ids on filesystems
//! that store decomposed names.

use crate::error::FingerprintError;
use std::path::{Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize the project root once per fingerprint run.
pub fn canonicalize_root(root: &Path) -> Result<PathBuf, FingerprintError> {
    dunce::canonicalize(root)
        .map_err(|e| FingerprintError::io(root.to_string_lossy().into_owned(), e))
}

/// Normalize a caller-declared path into an id (without filesystem access)
///
/// - converts `\` to `/`
/// - strips a leading `./` and trailing slashes
/// - normalizes Unicode to NFC
pub fn normalize_id(path: &str) -> String {
    let normalized: String = path.nfc().collect();
    let mut result = normalized.replace('\\', "/");

    while let Some(rest) = result.strip_prefix("./") {
        result = rest.to_string();
    }
    while result.len() > 1 && result.ends_with('/') {
        result.pop();
    }

    result
}

/// Normalize a single directory entry name
pub fn normalize_name(name: &str) -> String {
    name.nfc().collect()
}

/// Id of a child entry inside a directory id
pub fn join_id(dir_id: &str, name: &str) -> String {
    if dir_id.is_empty() || dir_id == "." {
        name.to_string()
    } else if dir_id.ends_with('/') {
        format!("{}{}", dir_id, name)
    } else {
        format!("{}/{}", dir_id, name)
    }
}

/// Filesystem location of an id under the project root
pub fn resolve(project_root: &Path, id: &str) -> PathBuf {
    if id.is_empty() || id == "." {
        return project_root.to_path_buf();
    }
    let mut path = project_root.to_path_buf();
    for component in id.split('/').filter(|c| !c.is_empty()) {
        path.push(component);
    }
    path
}
