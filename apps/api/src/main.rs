mod config;
mod docai;
mod documents;
mod embedding;
mod errors;
mod extract;
mod matching;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::docai::DocAiClient;
use crate::documents::store::DocumentStore;
use crate::embedding::local::LocalEmbeddingProvider;
use crate::embedding::EmbeddingProvider;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shortlist API v{}", env!("CARGO_PKG_VERSION"));
    info!("Similarity threshold: {}", config.similarity_threshold);

    // Initialize the document store
    let store = DocumentStore::new(&config);
    store.ensure_dirs().await?;
    info!("Document store ready under {}", config.data_dir.display());

    // Load the embedding model once; the first run downloads the ONNX weights,
    // so the load runs on the blocking pool.
    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(tokio::task::spawn_blocking(LocalEmbeddingProvider::new).await??);

    // Document AI client, only when configured
    let docai = config.docai.as_ref().map(DocAiClient::new);
    if docai.is_some() {
        info!("Document AI processing enabled");
    }

    // Outbound HTTP client for URL-based ingestion
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .build()?;

    // Build app state
    let state = AppState {
        config: config.clone(),
        embedder,
        store: Arc::new(store),
        docai,
        http,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
