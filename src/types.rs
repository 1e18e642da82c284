//! Core data model: sources, per-source hash results and the final fingerprint.

use serde::{Deserialize, Serialize};

/// One hashable unit supplied by the caller.
///
/// `reasons` is diagnostic metadata describing why the source was collected;
/// the engine carries it through but never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HashSource {
    /// Inline bytes identified by a logical id
    Contents {
        id: String,
        #[serde(with = "text_bytes")]
        contents: Vec<u8>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        reasons: Vec<String>,
        #[serde(
            default,
            rename = "overrideHashKey",
            skip_serializing_if = "Option::is_none"
        )]
        override_hash_key: Option<String>,
    },
    /// A single file, path relative to the project root
    File {
        #[serde(rename = "filePath")]
        file_path: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        reasons: Vec<String>,
        #[serde(
            default,
            rename = "overrideHashKey",
            skip_serializing_if = "Option::is_none"
        )]
        override_hash_key: Option<String>,
    },
    /// A directory subtree, path relative to the project root
    Dir {
        #[serde(rename = "filePath")]
        file_path: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        reasons: Vec<String>,
        #[serde(
            default,
            rename = "overrideHashKey",
            skip_serializing_if = "Option::is_none"
        )]
        override_hash_key: Option<String>,
    },
}

impl HashSource {
    pub fn contents(id: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        HashSource::Contents {
            id: id.into(),
            contents: contents.into(),
            reasons: Vec::new(),
            override_hash_key: None,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        HashSource::File {
            file_path: path.into(),
            reasons: Vec::new(),
            override_hash_key: None,
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        HashSource::Dir {
            file_path: path.into(),
            reasons: Vec::new(),
            override_hash_key: None,
        }
    }

    /// Attach a diagnostic reason
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        match &mut self {
            HashSource::Contents { reasons, .. }
            | HashSource::File { reasons, .. }
            | HashSource::Dir { reasons, .. } => reasons.push(reason.into()),
        }
        self
    }

    /// Replace the key this source contributes to the aggregate digest
    pub fn with_override_hash_key(mut self, key: impl Into<String>) -> Self {
        match &mut self {
            HashSource::Contents {
                override_hash_key, ..
            }
            | HashSource::File {
                override_hash_key, ..
            }
            | HashSource::Dir {
                override_hash_key, ..
            } => *override_hash_key = Some(key.into()),
        }
        self
    }

    /// Declared id (contents id or file path)
    pub fn id(&self) -> &str {
        match self {
            HashSource::Contents { id, .. } => id,
            HashSource::File { file_path, .. } | HashSource::Dir { file_path, .. } => file_path,
        }
    }

    /// Key fed into the aggregate digest: the override key when present, the declared id otherwise
    pub fn source_id(&self) -> &str {
        match self {
            HashSource::Contents {
                override_hash_key, ..
            }
            | HashSource::File {
                override_hash_key, ..
            }
            | HashSource::Dir {
                override_hash_key, ..
            } => override_hash_key.as_deref().unwrap_or_else(|| self.id()),
        }
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            HashSource::Contents { reasons, .. }
            | HashSource::File { reasons, .. }
            | HashSource::Dir { reasons, .. } => reasons,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            HashSource::Contents { .. } => SourceKind::Contents,
            HashSource::File { .. } => SourceKind::File,
            HashSource::Dir { .. } => SourceKind::Dir,
        }
    }
}

/// Source discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Contents,
    File,
    Dir,
}

impl SourceKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "contents" => Some(SourceKind::Contents),
            "file" => Some(SourceKind::File),
            "dir" => Some(SourceKind::Dir),
            _ => None,
        }
    }
}

/// Digest of one hashed node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashResult {
    pub kind: SourceKind,
    /// Path or logical identifier, never derived from content
    pub id: String,
    /// Lowercase hex digest
    pub hex: String,
    /// Present only when debug mode is enabled
    pub debug_info: Option<DebugInfo>,
}

/// Result of hashing a node: either excluded by an ignore rule or hashed.
///
/// An excluded node contributes nothing to its parent, which is distinct from
/// a node whose (possibly empty) content was hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashOutcome {
    Excluded,
    Hashed(HashResult),
}

impl HashOutcome {
    pub fn hex(&self) -> Option<&str> {
        match self {
            HashOutcome::Excluded => None,
            HashOutcome::Hashed(result) => Some(&result.hex),
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, HashOutcome::Excluded)
    }

    pub fn into_result(self) -> Option<HashResult> {
        match self {
            HashOutcome::Excluded => None,
            HashOutcome::Hashed(result) => Some(result),
        }
    }
}

/// Diagnostic tree recorded in debug mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DebugInfo {
    Contents {
        hash: String,
        #[serde(rename = "isTransformed", skip_serializing_if = "Option::is_none")]
        is_transformed: Option<bool>,
    },
    File {
        path: String,
        hash: String,
        #[serde(rename = "isTransformed", skip_serializing_if = "Option::is_none")]
        is_transformed: Option<bool>,
    },
    Dir {
        path: String,
        hash: String,
        children: Vec<DebugInfo>,
    },
}

/// A caller source with its computed hash attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintSource {
    #[serde(flatten)]
    pub source: HashSource,
    /// `None` when the source was excluded
    pub hash: Option<String>,
    #[serde(
        default,
        rename = "debugInfo",
        skip_serializing_if = "Option::is_none"
    )]
    pub debug_info: Option<DebugInfo>,
}

/// Final aggregate fingerprint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub sources: Vec<FingerprintSource>,
    pub hash: String,
}

impl Fingerprint {
    /// Sources that contributed to the aggregate digest
    pub fn hashed_sources(&self) -> impl Iterator<Item = &FingerprintSource> {
        self.sources.iter().filter(|s| s.hash.is_some())
    }
}

/// Inline contents travel as text in JSON, or as a byte array when they are not UTF-8
mod text_bytes {
    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        match std::str::from_utf8(bytes) {
            Ok(text) => serializer.serialize_str(text),
            Err(_) => serializer.serialize_bytes(bytes),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        deserializer.deserialize_any(TextOrBytes)
    }

    struct TextOrBytes;

    impl<'de> Visitor<'de> for TextOrBytes {
        type Value = Vec<u8>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or an array of bytes")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.as_bytes().to_vec())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(value.into_bytes())
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Ok(value.to_vec())
        }

        fn visit_byte_buf<E: de::Error>(self, value: Vec<u8>) -> Result<Self::Value, E> {
            Ok(value)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(byte) = seq.next_element::<u8>()? {
                bytes.push(byte);
            }
            Ok(bytes)
        }
    }
}
