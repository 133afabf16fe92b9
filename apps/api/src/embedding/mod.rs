//! Text-to-vector embedding.
//!
//! `EmbeddingProvider` is the capability seam between the ranking pipeline and
//! the pretrained sentence-embedding model, so tests can substitute canned
//! vectors without loading ONNX weights. The production implementation lives
//! in [`local`].

pub mod local;

use anyhow::Result;

/// Number of dimensions produced by all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Maps text to a fixed-dimensionality vector, deterministic for a fixed
/// model version. Methods are synchronous; async callers should dispatch
/// through `tokio::task::spawn_blocking`. Callers are responsible for not
/// passing empty or whitespace-only text.
#[allow(dead_code)]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts. Implementations may override for batched inference.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIM
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use anyhow::{anyhow, Result};

    use super::EmbeddingProvider;

    /// Test double returning canned vectors keyed by exact input text.
    pub(crate) struct CannedEmbeddings {
        vectors: HashMap<String, Vec<f32>>,
    }

    impl CannedEmbeddings {
        pub(crate) fn new(entries: &[(&str, &[f32])]) -> Self {
            Self {
                vectors: entries
                    .iter()
                    .map(|(text, vector)| (text.to_string(), vector.to_vec()))
                    .collect(),
            }
        }
    }

    impl EmbeddingProvider for CannedEmbeddings {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.vectors
                .get(text)
                .cloned()
                .ok_or_else(|| anyhow!("no canned vector for text: {text:?}"))
        }
    }
}
