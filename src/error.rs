use axum::http::StatusCode;
use thiserror::Error;

/// Errors that can occur across the retrieval pipeline.
///
/// The split between `ProviderUnavailable` (missing credential, detectable at
/// startup) and `Provider` (transient upstream failure) matters for callers:
/// the first is operator-correctable, the second is retryable.
#[derive(Error, Debug)]
pub enum Error {
    #[error("query must not be empty")]
    InvalidQuery,

    #[error("{provider} provider is not configured (no API key set)")]
    ProviderUnavailable { provider: &'static str },

    #[error("{provider} provider error: {reason}")]
    Provider {
        provider: &'static str,
        reason: String,
    },

    #[error("embedding provider returned no vector")]
    EmbeddingFailed,

    #[error("document store error: {0}")]
    Store(String),

    #[error("document not found")]
    NotFound,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidQuery => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::ProviderUnavailable { .. }
            | Error::Provider { .. }
            | Error::EmbeddingFailed
            | Error::Store(_)
            | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tantivy::TantivyError> for Error {
    fn from(e: tantivy::TantivyError) -> Self {
        Error::Store(e.to_string())
    }
}

/// Handlers return `Result<_, (StatusCode, String)>`, so `?` works on any
/// pipeline error.
impl From<Error> for (StatusCode, String) {
    fn from(e: Error) -> Self {
        (e.status(), e.to_string())
    }
}
