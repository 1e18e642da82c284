//! Header import normalizer
//!
//! Native projects import framework headers in several spellings depending on
//! how the dependency was installed: `#import "RCTBridge.h"`,
//! `#import "React/RCTBridge.h"` or `#import <React/RCTBridge.h>`. The
//! normalizer rewrites the quoted forms (and `__has_include` probes) into the
//! namespaced angle form when the header is a known framework header, so the
//! spelling does not leak into the fingerprint.
//!
//! Only the first `window` bytes of a file are inspected; imports live at the
//! top. Rewrites are line-local and the transform holds back the trailing
//! partial line of each chunk, so the output is independent of read chunking.

use super::known_headers::REACT_HEADERS;
use super::ChunkTransform;
use regex::bytes::{Captures, Regex};
use std::collections::HashSet;
use std::sync::Arc;

/// Default size of the inspected window
pub const DEFAULT_WINDOW_BYTES: usize = 16 * 1024;

/// File extensions the normalizer applies to
pub const DEFAULT_EXTENSIONS: &[&str] = &["h", "m", "mm"];

/// Rewrite rules shared by every file of a fingerprint run
#[derive(Debug, Clone)]
pub struct HeaderNormalizer {
    namespace: String,
    known_headers: HashSet<String>,
    window: usize,
    extensions: Vec<String>,
    import_re: Regex,
    has_include_re: Regex,
}

impl HeaderNormalizer {
    /// Normalizer for `namespace`, recognizing `known_headers` (names without `.h`)
    pub fn new<I, S>(namespace: impl Into<String>, known_headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            namespace: namespace.into(),
            known_headers: known_headers.into_iter().map(Into::into).collect(),
            window: DEFAULT_WINDOW_BYTES,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect(),
            import_re: Regex::new(r#"#import[ \t]+"([^"\n]+)\.h""#)
                .expect("static import pattern"),
            has_include_re: Regex::new(
                r#"#(if|elif)[ \t]+__has_include\([ \t]*"([^"\n]+)\.h"[ \t]*\)"#,
            )
            .expect("static __has_include pattern"),
        }
    }

    /// React Native core headers under the `React` namespace
    pub fn react() -> Self {
        Self::new("React", REACT_HEADERS.iter().copied())
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Whether a file path has one of the configured extensions
    pub fn applies_to(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self.extensions.iter().any(|e| e == ext),
            _ => false,
        }
    }

    /// Namespaced spelling of a header name, if it is a known header.
    fn canonical_header(&self, name: &str) -> Option<String> {
        if self.known_headers.contains(name) {
            return Some(format!("{}/{}.h", self.namespace, name));
        }
        let prefix = format!("{}/", self.namespace);
        name.strip_prefix(&prefix)
            .filter(|stripped| self.known_headers.contains(*stripped))
            .map(|stripped| format!("{}/{}.h", self.namespace, stripped))
    }

    /// Rewrite every recognized line in `content`
    pub fn rewrite(&self, content: &[u8]) -> Vec<u8> {
        let imported = self.import_re.replace_all(content, |caps: &Captures<'_>| {
            let name = String::from_utf8_lossy(&caps[1]);
            match self.canonical_header(&name) {
                Some(header) => format!("#import <{}>", header).into_bytes(),
                None => caps[0].to_vec(),
            }
        });
        self.has_include_re
            .replace_all(&imported, |caps: &Captures<'_>| {
                let directive = String::from_utf8_lossy(&caps[1]);
                let name = String::from_utf8_lossy(&caps[2]);
                match self.canonical_header(&name) {
                    Some(header) => {
                        format!("#{} __has_include(<{}>)", directive, header).into_bytes()
                    }
                    None => caps[0].to_vec(),
                }
            })
            .into_owned()
    }

    /// Start a streaming transform for one file
    pub fn stream(self: &Arc<Self>) -> HeaderImportsTransform {
        HeaderImportsTransform::new(Arc::clone(self))
    }
}

/// Streaming state for one file: window bytes consumed plus the held-back partial line
pub struct HeaderImportsTransform {
    normalizer: Arc<HeaderNormalizer>,
    consumed: usize,
    pending: Vec<u8>,
}

impl HeaderImportsTransform {
    pub fn new(normalizer: Arc<HeaderNormalizer>) -> Self {
        Self {
            normalizer,
            consumed: 0,
            pending: Vec::new(),
        }
    }

    fn window_open(&self) -> bool {
        self.consumed < self.normalizer.window
    }
}

impl ChunkTransform for HeaderImportsTransform {
    fn transform(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> anyhow::Result<()> {
        if !self.window_open() {
            out.extend_from_slice(chunk);
            return Ok(());
        }

        let take = (self.normalizer.window - self.consumed).min(chunk.len());
        self.consumed += take;
        self.pending.extend_from_slice(&chunk[..take]);

        if !self.window_open() {
            out.extend(self.normalizer.rewrite(&self.pending));
            self.pending.clear();
        } else if let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') {
            let rest = self.pending.split_off(pos + 1);
            out.extend(self.normalizer.rewrite(&self.pending));
            self.pending = rest;
        }

        out.extend_from_slice(&chunk[take..]);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> anyhow::Result<()> {
        if !self.pending.is_empty() {
            out.extend(self.normalizer.rewrite(&self.pending));
            self.pending.clear();
        }
        Ok(())
    }
}
