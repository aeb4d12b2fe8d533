use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::chunking;
use crate::error::Error;
use crate::models::{DeleteResponse, DocumentView, UploadRequest, UploadResponse};
use crate::state::AppState;
use crate::store::NewChunk;

/// POST /api/upload-text - Chunk, embed, and store reference text (admin).
///
/// Embedding is batched; a failed batch is logged and skipped so one bad
/// request does not lose the whole upload. Only when every batch fails does
/// the upload error out.
pub async fn upload_text(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Result<(StatusCode, Json<UploadResponse>), (StatusCode, String)> {
    let text = req.text.trim().to_string();
    if text.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Text is required".to_string()));
    }
    let title = req
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    if !state.embedder.is_configured() {
        return Err(Error::ProviderUnavailable {
            provider: "embedding",
        }
        .into());
    }

    let chunk_texts =
        chunking::chunk_words(&text, &state.config.chunking).map_err(<(StatusCode, String)>::from)?;

    let mut new_chunks: Vec<NewChunk> = Vec::with_capacity(chunk_texts.len());
    let batch_size = state.config.embed_batch_size;

    for (batch_no, batch) in chunk_texts.chunks(batch_size).enumerate() {
        match state.embedder.embed_batch(batch).await {
            Ok(embeddings) => {
                for (i, (chunk_text, embedding)) in batch.iter().zip(embeddings).enumerate() {
                    new_chunks.push(NewChunk {
                        title: title.clone(),
                        text: chunk_text.clone(),
                        chunk_index: batch_no * batch_size + i,
                        keywords: chunking::derive_keywords(chunk_text),
                        embedding,
                    });
                }
            }
            Err(e) => {
                tracing::warn!(
                    "embedding batch {batch_no} failed, skipping {} chunks: {e}",
                    batch.len()
                );
            }
        }
    }

    if new_chunks.is_empty() {
        return Err(Error::EmbeddingFailed.into());
    }

    let ids = state
        .store
        .insert(new_chunks)
        .map_err(<(StatusCode, String)>::from)?;

    tracing::info!("stored {} chunks from one upload", ids.len());

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            inserted_chunks: ids.len(),
            success: true,
        }),
    ))
}

/// GET /api/documents - List all stored chunks, newest first (admin).
pub async fn list_documents(State(state): State<AppState>) -> Json<Vec<DocumentView>> {
    let documents = state
        .store
        .list_all()
        .into_iter()
        .map(DocumentView::from)
        .collect();
    Json(documents)
}

/// DELETE /api/documents/{id} - Remove one chunk (admin).
///
/// Deleting an id twice reports not-found on the second call; the first
/// deletion stays deleted.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, (StatusCode, String)> {
    let removed = state
        .store
        .delete_by_id(id)
        .map_err(<(StatusCode, String)>::from)?;

    if !removed {
        return Err(Error::NotFound.into());
    }

    Ok(Json(DeleteResponse { success: true }))
}
