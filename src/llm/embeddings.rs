use serde::{Deserialize, Serialize};

use crate::config::EmbeddingConfig;
use crate::error::Error;

/// Maximum characters to send per text to the embedding API. Chunks are
/// ~100 words so this only guards against pathological inputs (a single
/// enormous "word" survives whitespace chunking intact).
const MAX_EMBED_CHARS: usize = 8_000;

/// Truncate `text` to at most `MAX_EMBED_CHARS`, splitting on a UTF-8 char boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Client for the embedding provider.
///
/// One instance is constructed at startup and shared; `is_configured` is
/// fixed for the process lifetime.
pub struct EmbeddingClient {
    http: reqwest::Client,
    config: EmbeddingConfig,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    pub fn new(http: reqwest::Client, config: EmbeddingConfig) -> Self {
        Self { http, config }
    }

    /// Whether an API key is present. Checked by callers at startup so the
    /// operator sees a distinct "not configured" message, not a request error.
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Expected vector dimension for this provider.
    pub fn dimension(&self) -> usize {
        self.config.dimension
    }

    /// Embed one batch of texts. Returns one vector per input, in order.
    ///
    /// The call either fully succeeds or fails as a whole; callers decide
    /// whether to skip the batch (upload path) or abort (query path).
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(Error::ProviderUnavailable {
                provider: "embedding",
            })?;

        let url = format!("{}/v1/embeddings", self.config.base_url);
        let req = EmbedRequest {
            model: self.config.model.clone(),
            input: texts
                .iter()
                .map(|t| truncate_for_embedding(t).to_string())
                .collect(),
        };

        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&req)
            .send()
            .await
            .map_err(|e| Error::Provider {
                provider: "embedding",
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Provider {
                provider: "embedding",
                reason: format!("API returned {status}: {body}"),
            });
        }

        let body: EmbedResponse = resp.json().await.map_err(|e| Error::Provider {
            provider: "embedding",
            reason: format!("unparseable response: {e}"),
        })?;

        if body.data.len() != texts.len() {
            return Err(Error::Provider {
                provider: "embedding",
                reason: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    body.data.len()
                ),
            });
        }

        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }

    /// Embed a single text (the query path).
    pub async fn embed_single(&self, text: &str) -> Result<Vec<f32>, Error> {
        let vectors = self.embed_batch(&[text.to_string()]).await?;
        let vector = vectors.into_iter().next().ok_or(Error::EmbeddingFailed)?;
        if vector.is_empty() {
            return Err(Error::EmbeddingFailed);
        }
        Ok(vector)
    }
}
