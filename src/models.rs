use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored unit of retrieval: one window of uploaded text plus its
/// embedding and derived keywords. Immutable after insertion; correction
/// is delete + re-upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// Zero-based position among chunks from the same upload
    pub chunk_index: usize,
    pub keywords: Vec<String>,
    pub embedding: Vec<f32>,
    pub created_at: DateTime<Utc>,
}

/// Which retrieval strategy produced a result's score. Scores are only
/// comparable within a type; the merge step ranks the union by raw value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoreType {
    Lexical,
    Semantic,
}

/// A ranked retrieval candidate, ready for answer composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub chunk_id: Uuid,
    pub title: String,
    pub text: String,
    pub score: f32,
    pub score_type: ScoreType,
}

/// Search request
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<RankedResult>,
    pub answer: String,
    pub success: bool,
}

/// Upload-text request (admin)
#[derive(Debug, Clone, Deserialize)]
pub struct UploadRequest {
    pub title: Option<String>,
    pub text: String,
}

/// Upload-text response
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub inserted_chunks: usize,
    pub success: bool,
}

/// Delete response
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Chunk as listed by the admin endpoint. Embeddings are large and opaque,
/// so they stay out of the JSON surface.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub chunk_index: usize,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Chunk> for DocumentView {
    fn from(c: Chunk) -> Self {
        Self {
            id: c.id,
            title: c.title,
            text: c.text,
            chunk_index: c.chunk_index,
            keywords: c.keywords,
            created_at: c.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_type_serializes_to_snake_case() {
        assert_eq!(
            serde_json::to_value(ScoreType::Semantic).unwrap(),
            "semantic"
        );
        assert_eq!(serde_json::to_value(ScoreType::Lexical).unwrap(), "lexical");
    }

    #[test]
    fn test_search_request_limit_defaults_to_five() {
        let req: SearchRequest = serde_json::from_str(r#"{"query": "hello"}"#).unwrap();
        assert_eq!(req.limit, 5);
    }

    #[test]
    fn test_search_request_explicit_limit() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"query": "hello", "limit": 12}"#).unwrap();
        assert_eq!(req.limit, 12);
    }

    #[test]
    fn test_document_view_omits_embedding() {
        let chunk = Chunk {
            id: Uuid::new_v4(),
            title: "t".into(),
            text: "body".into(),
            chunk_index: 0,
            keywords: vec!["body".into()],
            embedding: vec![0.1, 0.2],
            created_at: Utc::now(),
        };
        let view: DocumentView = chunk.into();
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("embedding").is_none());
        assert_eq!(json["text"], "body");
    }
}
