use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::answer;
use crate::error::Error;
use crate::models::{SearchRequest, SearchResponse};
use crate::search::retrieval;
use crate::state::AppState;

/// Hard cap on the result-count limit a client may request.
const MAX_LIMIT: usize = 50;

/// POST /api/search - Hybrid retrieval plus a grounded answer.
///
/// Retrieval failures are real errors; answer-generation failures are not.
/// A query that matches nothing returns 200 with empty results and the
/// fixed fallback answer.
pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let query = req.query.trim().to_string();
    if query.is_empty() {
        return Err(Error::InvalidQuery.into());
    }
    let limit = req.limit.clamp(1, MAX_LIMIT);

    let results = retrieval::retrieve(
        &state.store,
        &state.embedder,
        &query,
        limit,
        &state.config.retrieval,
    )
    .await
    .map_err(|e| {
        tracing::error!("retrieval failed for query: {e}");
        <(StatusCode, String)>::from(e)
    })?;

    let answer = answer::compose(&state.generator, &query, &results).await;

    Ok(Json(SearchResponse {
        query,
        results,
        answer,
        success: true,
    }))
}
