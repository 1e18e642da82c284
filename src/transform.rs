//! Content transforms applied to file bytes before digesting
//!
//! Transforms make two trees that differ only in environment-introduced
//! formatting hash identically. Each transform is a stateful streaming object:
//! it receives chunks as they are read and may hold back bytes until it has
//! enough context, releasing them on `finish`.

pub mod header_imports;
pub mod hook;
pub mod known_headers;

pub use header_imports::{HeaderImportsTransform, HeaderNormalizer};
pub use hook::{FileHook, HookSource, HookTransform};

/// Streaming byte rewrite
pub trait ChunkTransform: Send {
    /// Consume one chunk, appending whatever is ready to `out`
    fn transform(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> anyhow::Result<()>;

    /// End of stream: flush held bytes into `out`
    fn finish(&mut self, out: &mut Vec<u8>) -> anyhow::Result<()>;

    /// Whether any output differed from input (debug mode only)
    fn is_transformed(&self) -> Option<bool> {
        None
    }
}

/// Sequential composition of transforms
#[derive(Default)]
pub struct TransformPipeline {
    stages: Vec<Box<dyn ChunkTransform>>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_stage(&mut self, stage: Box<dyn ChunkTransform>) {
        self.stages.push(stage);
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run one chunk through every stage
    pub fn transform(&mut self, chunk: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut data = chunk.to_vec();
        for stage in &mut self.stages {
            let mut out = Vec::with_capacity(data.len());
            stage.transform(&data, &mut out)?;
            data = out;
        }
        Ok(data)
    }

    /// Flush every stage in order; bytes released by one stage still pass through the later ones
    pub fn finish(&mut self) -> anyhow::Result<Vec<u8>> {
        let mut carried = Vec::new();
        for stage in &mut self.stages {
            let mut out = Vec::new();
            if !carried.is_empty() {
                stage.transform(&carried, &mut out)?;
            }
            stage.finish(&mut out)?;
            carried = out;
        }
        Ok(carried)
    }

    /// `Some(true)` when any stage reported a rewrite
    pub fn is_transformed(&self) -> Option<bool> {
        self.stages
            .iter()
            .filter_map(|stage| stage.is_transformed())
            .reduce(|a, b| a || b)
    }
}
