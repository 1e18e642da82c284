//! Digest computation for sources, files and directories

use crate::error::FingerprintError;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

/// Named cryptographic digest used for every node of a fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha1,
    Sha256,
    Sha512,
    Blake3,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Blake3 => "blake3",
        }
    }

    /// Start an incremental digest
    pub fn digester(&self) -> Digester {
        match self {
            HashAlgorithm::Sha1 => Digester::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => Digester::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => Digester::Sha512(Sha512::new()),
            HashAlgorithm::Blake3 => Digester::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "").as_str() {
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "blake3" => Ok(HashAlgorithm::Blake3),
            _ => Err(FingerprintError::InvalidHashAlgorithm(s.to_string())),
        }
    }
}

/// Incremental digest accumulator
pub enum Digester {
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
    Blake3(Box<blake3::Hasher>),
}

impl Digester {
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Digester::Sha1(h) => h.update(data),
            Digester::Sha256(h) => h.update(data),
            Digester::Sha512(h) => h.update(data),
            Digester::Blake3(h) => {
                h.update(data);
            }
        }
    }

    /// Feed one `(id, hex)` pair of a child or source
    pub fn update_entry(&mut self, id: &str, hex: &str) {
        self.update(id.as_bytes());
        self.update(hex.as_bytes());
    }

    /// Consume the accumulator and return the lowercase hex digest
    pub fn finalize_hex(self) -> String {
        match self {
            Digester::Sha1(h) => hex::encode(h.finalize()),
            Digester::Sha256(h) => hex::encode(h.finalize()),
            Digester::Sha512(h) => hex::encode(h.finalize()),
            Digester::Blake3(h) => h.finalize().to_hex().to_string(),
        }
    }
}

/// Digest of a byte slice in one call
pub fn compute_hash(algorithm: HashAlgorithm, data: &[u8]) -> String {
    let mut digester = algorithm.digester();
    digester.update(data);
    digester.finalize_hex()
}

/// Digest of an ordered list of `(id, hex)` pairs.
///
/// Callers are responsible for ordering: directories pass name-sorted
/// children, the aggregator passes sources in declared order.
pub fn compute_entries_hash<'a, I>(algorithm: HashAlgorithm, entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut digester = algorithm.digester();
    for (id, hex) in entries {
        digester.update_entry(id, hex);
    }
    digester.finalize_hex()
}
