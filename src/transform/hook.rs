//! Caller-supplied content hook
//!
//! The hook sees every chunk of every hashed file (and every inline contents
//! source) and returns the bytes to digest in its place: `Some(bytes)` to emit,
//! `None` to drop the chunk. After the last chunk of a file it is called once
//! more with no chunk and `is_end_of_file = true`, which lets it append a
//! trailer.

use super::ChunkTransform;
use std::sync::Arc;

/// What the hook is currently looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookSource<'a> {
    File { path: &'a str },
    Contents { id: &'a str },
}

/// Content rewrite hook
pub trait FileHook: Send + Sync {
    fn transform(
        &self,
        source: &HookSource<'_>,
        chunk: Option<&[u8]>,
        is_end_of_file: bool,
    ) -> anyhow::Result<Option<Vec<u8>>>;
}

impl<F> FileHook for F
where
    F: Fn(&HookSource<'_>, Option<&[u8]>, bool) -> anyhow::Result<Option<Vec<u8>>> + Send + Sync,
{
    fn transform(
        &self,
        source: &HookSource<'_>,
        chunk: Option<&[u8]>,
        is_end_of_file: bool,
    ) -> anyhow::Result<Option<Vec<u8>>> {
        self(source, chunk, is_end_of_file)
    }
}

/// Streaming adapter running a hook over one file
pub struct HookTransform {
    hook: Arc<dyn FileHook>,
    path: String,
    debug: bool,
    transformed: bool,
}

impl HookTransform {
    pub fn new(hook: Arc<dyn FileHook>, path: impl Into<String>, debug: bool) -> Self {
        Self {
            hook,
            path: path.into(),
            debug,
            transformed: false,
        }
    }
}

impl ChunkTransform for HookTransform {
    fn transform(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> anyhow::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        let source = HookSource::File { path: &self.path };
        let result = self.hook.transform(&source, Some(chunk), false)?;
        if self.debug && result.as_deref() != Some(chunk) {
            self.transformed = true;
        }
        if let Some(bytes) = result {
            out.extend(bytes);
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> anyhow::Result<()> {
        let source = HookSource::File { path: &self.path };
        let result = self.hook.transform(&source, None, true)?;
        if let Some(bytes) = result {
            if self.debug && !bytes.is_empty() {
                self.transformed = true;
            }
            out.extend(bytes);
        }
        Ok(())
    }

    fn is_transformed(&self) -> Option<bool> {
        self.debug.then_some(self.transformed)
    }
}

/// Run the hook over inline contents as a single final chunk.
///
/// Returns the bytes to digest and, in debug mode, whether they changed.
pub fn transform_contents(
    hook: &dyn FileHook,
    id: &str,
    contents: &[u8],
    debug: bool,
) -> anyhow::Result<(Vec<u8>, Option<bool>)> {
    let source = HookSource::Contents { id };
    let transformed = hook
        .transform(&source, Some(contents), true)?
        .unwrap_or_default();
    let changed = debug.then(|| transformed.as_slice() != contents);
    Ok((transformed, changed))
}
