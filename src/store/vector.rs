use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Error;
use crate::models::Chunk;

/// In-memory chunk records with disk persistence and cosine similarity
/// search. This is the system of record; the text index holds only a
/// searchable projection keyed by id.
pub struct VectorRecords {
    entries: RwLock<Vec<Chunk>>,
    persist_path: PathBuf,
}

impl VectorRecords {
    pub fn open_or_create(persist_path: &Path) -> Result<Self, Error> {
        if let Some(parent) = persist_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Store(e.to_string()))?;
        }

        let entries = if persist_path.exists() {
            let data = std::fs::read_to_string(persist_path)
                .map_err(|e| Error::Store(format!("failed to read chunk records: {e}")))?;
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(Self {
            entries: RwLock::new(entries),
            persist_path: persist_path.to_path_buf(),
        })
    }

    /// Append chunks and persist. Chunks are immutable once stored.
    pub fn insert(&self, chunks: Vec<Chunk>) -> Result<(), Error> {
        let mut entries = self.entries.write();
        entries.extend(chunks);
        self.persist(&entries)
    }

    /// Remove one chunk by id. Returns false when no record matched.
    pub fn delete(&self, id: Uuid) -> Result<bool, Error> {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|c| c.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.persist(&entries)?;
        Ok(true)
    }

    pub fn get(&self, id: Uuid) -> Option<Chunk> {
        self.entries.read().iter().find(|c| c.id == id).cloned()
    }

    /// All chunks, newest first.
    pub fn list_all(&self) -> Vec<Chunk> {
        let mut all: Vec<Chunk> = self.entries.read().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Top-k chunks by cosine similarity to `query`, restricted to
    /// similarity >= `min_similarity`. Zero-norm stored vectors are excluded
    /// because cosine similarity is undefined for them.
    pub fn search(&self, query: &[f32], k: usize, min_similarity: f32) -> Vec<(Chunk, f32)> {
        let entries = self.entries.read();

        let mut scored: Vec<(f32, &Chunk)> = entries
            .iter()
            .filter_map(|c| {
                cosine_similarity(query, &c.embedding)
                    .filter(|s| *s >= min_similarity)
                    .map(|s| (s, c))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        scored.into_iter().map(|(s, c)| (c.clone(), s)).collect()
    }

    /// Atomic write via temp file + rename so a crash mid-write never
    /// corrupts the record file.
    fn persist(&self, entries: &[Chunk]) -> Result<(), Error> {
        let data = serde_json::to_string(entries).map_err(|e| Error::Store(e.to_string()))?;
        let tmp_path = self.persist_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &data)
            .and_then(|_| std::fs::rename(&tmp_path, &self.persist_path))
            .map_err(|e| Error::Store(format!("failed to persist chunk records: {e}")))
    }
}

/// Cosine similarity, or None when either vector has zero norm or the
/// lengths disagree.
fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        None
    } else {
        Some(dot / denom)
    }
}
