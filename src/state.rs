use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::{EmbeddingClient, GenerativeClient};
use crate::store::DocumentStore;

/// Shared application state. Provider handles are constructed once here and
/// injected into the pipeline, so "configured vs not" is decided at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<DocumentStore>,
    pub embedder: Arc<EmbeddingClient>,
    pub generator: Arc<GenerativeClient>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let store = DocumentStore::open_or_create(
            &config.records_path(),
            &config.index_dir(),
            config.embedding.dimension,
        )?;

        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let embedder = EmbeddingClient::new(http_client.clone(), config.embedding.clone());
        let generator = GenerativeClient::new(http_client, config.generative.clone());

        if !embedder.is_configured() {
            tracing::warn!("embedding provider has no API key: upload and search are disabled");
        }
        if !generator.is_configured() {
            tracing::warn!("generative provider has no API key: answers will use fallback text");
        }

        Ok(Self {
            config,
            store: Arc::new(store),
            embedder: Arc::new(embedder),
            generator: Arc::new(generator),
        })
    }
}
