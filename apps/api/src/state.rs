use std::sync::Arc;

use reqwest::Client as HttpClient;

use crate::config::Config;
use crate::docai::DocAiClient;
use crate::documents::store::DocumentStore;
use crate::embedding::EmbeddingProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Sentence-embedding model, loaded once at startup and shared read-only.
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub store: Arc<DocumentStore>,
    /// Present only when the Document AI route is configured.
    pub docai: Option<DocAiClient>,
    /// Outbound client for URL-based document ingestion, with the configured
    /// fetch timeout applied.
    pub http: HttpClient,
}
