use std::sync::Mutex;

use anyhow::{anyhow, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use super::{EmbeddingProvider, EMBEDDING_DIM};

/// Embedding provider backed by the fastembed ONNX runtime running
/// all-MiniLM-L6-v2. Constructed once at startup and shared across request
/// handlers; the model embeds through `&mut self`, hence the mutex.
pub struct LocalEmbeddingProvider {
    model: Mutex<TextEmbedding>,
}

impl LocalEmbeddingProvider {
    /// Loads the model. Blocking; the first run downloads the ONNX weights.
    pub fn new() -> Result<Self> {
        info!("Loading sentence embedding model (all-MiniLM-L6-v2)...");
        let model = TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
            .map_err(|e| anyhow!("failed to initialize the embedding model: {e}"))?;
        info!("Embedding model ready ({EMBEDDING_DIM} dimensions)");
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl EmbeddingProvider for LocalEmbeddingProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| anyhow!("embedding model returned no vector"))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut model = self
            .model
            .lock()
            .map_err(|_| anyhow!("embedding model mutex poisoned"))?;
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| anyhow!("embedding inference failed: {e}"))
    }
}
