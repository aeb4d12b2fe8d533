use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the document store keeps its record file and text index
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,
    /// Generative answer provider configuration
    pub generative: GenerativeConfig,
    /// Chunking policy for uploaded text
    pub chunking: ChunkingConfig,
    /// Retrieval tuning knobs
    pub retrieval: RetrievalConfig,
    /// Chunks per embedding request at upload time
    pub embed_batch_size: usize,
    /// Total timeout for provider HTTP calls, in seconds
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Base URL for an OpenAI-compatible embeddings API
    pub base_url: String,
    /// Model name to request
    pub model: String,
    /// API key; None means the provider is unconfigured
    pub api_key: Option<String>,
    /// Vector dimension the provider returns
    pub dimension: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativeConfig {
    /// Base URL for an OpenAI-compatible chat completions API
    pub base_url: String,
    /// Model name to request
    pub model: String,
    /// API key; None means the provider is unconfigured
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Words per chunk window
    pub chunk_size: usize,
    /// Words shared between consecutive windows (must be < chunk_size)
    pub overlap: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Minimum cosine similarity for a semantic candidate
    pub similarity_threshold: f32,
    /// Minimum full-text relevance score for a lexical candidate
    pub lexical_min_score: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            bind_addr: "127.0.0.1:8080".to_string(),
            embedding: EmbeddingConfig::default(),
            generative: GenerativeConfig::default(),
            chunking: ChunkingConfig::default(),
            retrieval: RetrievalConfig::default(),
            embed_batch_size: 8,
            request_timeout_secs: 30,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.voyageai.com".to_string(),
            model: "voyage-2".to_string(),
            api_key: None,
            dimension: 1024,
        }
    }
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
        }
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 100,
            overlap: 20,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.70,
            lexical_min_score: 1.5,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("DOC_RAG_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("DOC_RAG_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(url) = std::env::var("EMBEDDING_BASE_URL") {
            config.embedding.base_url = url;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embedding.model = model;
        }
        if let Ok(key) = std::env::var("EMBEDDING_API_KEY") {
            if !key.is_empty() {
                config.embedding.api_key = Some(key);
            }
        }
        if let Ok(dim) = std::env::var("EMBEDDING_DIM") {
            if let Ok(d) = dim.parse() {
                config.embedding.dimension = d;
            }
        }
        if let Ok(url) = std::env::var("GENERATIVE_BASE_URL") {
            config.generative.base_url = url;
        }
        if let Ok(model) = std::env::var("GENERATIVE_MODEL") {
            config.generative.model = model;
        }
        if let Ok(key) = std::env::var("GENERATIVE_API_KEY") {
            if !key.is_empty() {
                config.generative.api_key = Some(key);
            }
        }
        if let Ok(val) = std::env::var("DOC_RAG_CHUNK_SIZE") {
            if let Ok(v) = val.parse() {
                config.chunking.chunk_size = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_RAG_CHUNK_OVERLAP") {
            if let Ok(v) = val.parse() {
                config.chunking.overlap = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_RAG_SIMILARITY_THRESHOLD") {
            if let Ok(v) = val.parse() {
                config.retrieval.similarity_threshold = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_RAG_LEXICAL_MIN_SCORE") {
            if let Ok(v) = val.parse() {
                config.retrieval.lexical_min_score = v;
            }
        }
        if let Ok(val) = std::env::var("DOC_RAG_EMBED_BATCH_SIZE") {
            if let Ok(v) = val.parse::<usize>() {
                config.embed_batch_size = v.clamp(1, 64);
            }
        }
        if let Ok(val) = std::env::var("DOC_RAG_REQUEST_TIMEOUT_SECS") {
            if let Ok(v) = val.parse() {
                config.request_timeout_secs = v;
            }
        }

        config
    }

    /// Reject configurations the chunker cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be at least 1".to_string()));
        }
        if self.chunking.overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.overlap, self.chunking.chunk_size
            )));
        }
        if self.embed_batch_size == 0 {
            return Err(Error::Config(
                "embed_batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("chunks.json")
    }

    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }
}
