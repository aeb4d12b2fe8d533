//! Persistence for chunks: vector records plus a full-text index, behind one
//! facade exposing the operations the retrieval pipeline depends on
//! (insert, lookup, delete, nearest-neighbor query, full-text query).

pub mod text_index;
pub mod vector;

use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::error::Error;
use crate::models::Chunk;
use text_index::TextIndex;
use vector::VectorRecords;

/// A chunk prepared for insertion; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub title: Option<String>,
    pub text: String,
    pub chunk_index: usize,
    pub keywords: Vec<String>,
    pub embedding: Vec<f32>,
}

pub struct DocumentStore {
    records: VectorRecords,
    index: TextIndex,
    dimension: usize,
}

impl DocumentStore {
    /// Open or create the store under `data_dir`. `dimension` is the
    /// embedding dimension every stored chunk must carry.
    pub fn open_or_create(
        records_path: &Path,
        index_dir: &Path,
        dimension: usize,
    ) -> Result<Self, Error> {
        Ok(Self {
            records: VectorRecords::open_or_create(records_path)?,
            index: TextIndex::open_or_create(index_dir)?,
            dimension,
        })
    }

    /// Insert a batch of chunks from one upload. Assigns ids and timestamps;
    /// rejects empty text and embeddings of the wrong dimension.
    pub fn insert(&self, chunks: Vec<NewChunk>) -> Result<Vec<Uuid>, Error> {
        let now = Utc::now();
        let mut stored = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            if chunk.text.trim().is_empty() {
                return Err(Error::Store("chunk text must not be empty".to_string()));
            }
            if chunk.embedding.len() != self.dimension {
                return Err(Error::Store(format!(
                    "embedding dimension {} does not match store dimension {}",
                    chunk.embedding.len(),
                    self.dimension
                )));
            }
            let title = chunk
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| format!("Untitled chunk {}", chunk.chunk_index));
            stored.push(Chunk {
                id: Uuid::new_v4(),
                title,
                text: chunk.text,
                chunk_index: chunk.chunk_index,
                keywords: chunk.keywords,
                embedding: chunk.embedding,
                created_at: now,
            });
        }

        let ids: Vec<Uuid> = stored.iter().map(|c| c.id).collect();
        self.records.insert(stored.clone())?;
        self.index.index_chunks(&stored)?;
        Ok(ids)
    }

    pub fn find_by_id(&self, id: Uuid) -> Option<Chunk> {
        self.records.get(id)
    }

    /// Delete one chunk. Returns false when the id is unknown, so a repeated
    /// delete reports not-found rather than failing.
    pub fn delete_by_id(&self, id: Uuid) -> Result<bool, Error> {
        if !self.records.delete(id)? {
            return Ok(false);
        }
        self.index.delete(id)?;
        Ok(true)
    }

    /// Top-k chunks by cosine similarity, restricted to >= `min_similarity`.
    pub fn vector_search(&self, query: &[f32], k: usize, min_similarity: f32) -> Vec<(Chunk, f32)> {
        self.records.search(query, k, min_similarity)
    }

    /// Top-k chunks by full-text relevance over text/keywords/title,
    /// restricted to score >= `min_score`.
    pub fn text_search(
        &self,
        query: &str,
        k: usize,
        min_score: f32,
    ) -> Result<Vec<(Chunk, f32)>, Error> {
        let hits = self.index.search(query, k)?;
        Ok(hits
            .into_iter()
            .filter(|(_, score)| *score >= min_score)
            .filter_map(|(id, score)| self.records.get(id).map(|c| (c, score)))
            .collect())
    }

    /// All chunks, newest first.
    pub fn list_all(&self) -> Vec<Chunk> {
        self.records.list_all()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
