//! The retrieval engine: embed the query, run semantic and lexical search,
//! then merge, deduplicate, and rank.
//!
//! Pipeline per call (state-free; reads only the store):
//! 1. Validate the query is non-empty after trimming.
//! 2. Embed the query.
//! 3. Semantic search: top-`limit` chunks by cosine similarity, restricted
//!    to the configured threshold.
//! 4. Lexical search: top-`limit` chunks by full-text relevance, restricted
//!    to the configured minimum score.
//! 5. If semantic found nothing, the lexical ranking is used as-is.
//!    Otherwise the two sets are unioned; on id collision the semantic entry
//!    wins (its score space is higher fidelity).
//! 6. Sort by score descending (stable, so equal scores keep candidate
//!    order) and truncate to `limit`.
//!
//! An empty result is a valid outcome, not an error.

use crate::config::RetrievalConfig;
use crate::error::Error;
use crate::llm::EmbeddingClient;
use crate::models::{Chunk, RankedResult, ScoreType};
use crate::store::DocumentStore;

/// Full retrieval pipeline: validate, embed, search, merge.
pub async fn retrieve(
    store: &DocumentStore,
    embedder: &EmbeddingClient,
    query: &str,
    limit: usize,
    tuning: &RetrievalConfig,
) -> Result<Vec<RankedResult>, Error> {
    let query = query.trim();
    if query.is_empty() {
        return Err(Error::InvalidQuery);
    }

    let query_embedding = embedder.embed_single(query).await?;
    retrieve_with_embedding(store, &query_embedding, query, limit, tuning)
}

/// Retrieval for callers that already hold a query embedding.
pub fn retrieve_with_embedding(
    store: &DocumentStore,
    query_embedding: &[f32],
    query: &str,
    limit: usize,
    tuning: &RetrievalConfig,
) -> Result<Vec<RankedResult>, Error> {
    let semantic: Vec<RankedResult> = store
        .vector_search(query_embedding, limit, tuning.similarity_threshold)
        .into_iter()
        .map(|(chunk, score)| ranked(chunk, score, ScoreType::Semantic))
        .collect();

    let lexical: Vec<RankedResult> = store
        .text_search(query, limit, tuning.lexical_min_score)?
        .into_iter()
        .map(|(chunk, score)| ranked(chunk, score, ScoreType::Lexical))
        .collect();

    tracing::debug!(
        semantic = semantic.len(),
        lexical = lexical.len(),
        "retrieval candidates"
    );

    Ok(merge_ranked(semantic, lexical, limit))
}

fn ranked(chunk: Chunk, score: f32, score_type: ScoreType) -> RankedResult {
    RankedResult {
        chunk_id: chunk.id,
        title: chunk.title,
        text: chunk.text,
        score,
        score_type,
    }
}

/// Union semantic and lexical candidates, dropping lexical entries whose
/// chunk already appears semantically, then rank by score descending and
/// truncate. With no semantic candidates the lexical ranking passes through
/// unchanged.
pub fn merge_ranked(
    semantic: Vec<RankedResult>,
    lexical: Vec<RankedResult>,
    limit: usize,
) -> Vec<RankedResult> {
    if semantic.is_empty() {
        let mut results = lexical;
        results.truncate(limit);
        return results;
    }

    let mut results = semantic;
    for hit in lexical {
        if !results.iter().any(|r| r.chunk_id == hit.chunk_id) {
            results.push(hit);
        }
    }

    // Stable sort: equal scores keep candidate order
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn hit(id: Uuid, score: f32, score_type: ScoreType) -> RankedResult {
        RankedResult {
            chunk_id: id,
            title: "t".into(),
            text: format!("text scored {score}"),
            score,
            score_type,
        }
    }

    #[test]
    fn test_merge_empty_inputs() {
        assert!(merge_ranked(vec![], vec![], 5).is_empty());
    }

    #[test]
    fn test_fallback_to_lexical_when_semantic_empty() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let lexical = vec![
            hit(a, 3.2, ScoreType::Lexical),
            hit(b, 2.1, ScoreType::Lexical),
        ];

        let results = merge_ranked(vec![], lexical.clone(), 5);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk_id, a);
        assert_eq!(results[1].chunk_id, b);
        assert!(results.iter().all(|r| r.score_type == ScoreType::Lexical));
    }

    #[test]
    fn test_fallback_respects_limit() {
        let lexical: Vec<RankedResult> = (0..10)
            .map(|i| hit(Uuid::new_v4(), 10.0 - i as f32, ScoreType::Lexical))
            .collect();
        let results = merge_ranked(vec![], lexical, 3);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_union_keeps_both_score_types() {
        let semantic = vec![hit(Uuid::new_v4(), 0.9, ScoreType::Semantic)];
        let lexical = vec![hit(Uuid::new_v4(), 2.5, ScoreType::Lexical)];

        let results = merge_ranked(semantic, lexical, 5);
        assert_eq!(results.len(), 2);
        // Raw-score ordering: the lexical score happens to be larger
        assert_eq!(results[0].score_type, ScoreType::Lexical);
        assert_eq!(results[1].score_type, ScoreType::Semantic);
    }

    #[test]
    fn test_collision_prefers_semantic_entry() {
        let shared = Uuid::new_v4();
        let semantic = vec![hit(shared, 0.8, ScoreType::Semantic)];
        let lexical = vec![hit(shared, 4.0, ScoreType::Lexical)];

        let results = merge_ranked(semantic, lexical, 5);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk_id, shared);
        assert_eq!(results[0].score_type, ScoreType::Semantic);
        assert_eq!(results[0].score, 0.8);
    }

    #[test]
    fn test_no_chunk_id_appears_twice() {
        let shared1 = Uuid::new_v4();
        let shared2 = Uuid::new_v4();
        let only_lex = Uuid::new_v4();
        let semantic = vec![
            hit(shared1, 0.95, ScoreType::Semantic),
            hit(shared2, 0.80, ScoreType::Semantic),
        ];
        let lexical = vec![
            hit(shared2, 3.0, ScoreType::Lexical),
            hit(only_lex, 2.0, ScoreType::Lexical),
            hit(shared1, 1.8, ScoreType::Lexical),
        ];

        let results = merge_ranked(semantic, lexical, 10);
        let mut ids: Vec<Uuid> = results.iter().map(|r| r.chunk_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), results.len());
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let semantic = vec![
            hit(Uuid::new_v4(), 0.72, ScoreType::Semantic),
            hit(Uuid::new_v4(), 0.91, ScoreType::Semantic),
        ];
        let lexical = vec![hit(Uuid::new_v4(), 0.85, ScoreType::Lexical)];

        let results = merge_ranked(semantic, lexical, 5);
        let scores: Vec<f32> = results.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.91, 0.85, 0.72]);
    }

    #[test]
    fn test_equal_scores_keep_candidate_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let semantic = vec![hit(a, 0.8, ScoreType::Semantic)];
        let lexical = vec![hit(b, 0.8, ScoreType::Lexical)];

        let results = merge_ranked(semantic, lexical, 5);
        // Semantic block precedes lexical in the candidate union
        assert_eq!(results[0].chunk_id, a);
        assert_eq!(results[1].chunk_id, b);

        let again = merge_ranked(
            vec![hit(a, 0.8, ScoreType::Semantic)],
            vec![hit(b, 0.8, ScoreType::Lexical)],
            5,
        );
        assert_eq!(again[0].chunk_id, a);
    }

    #[test]
    fn test_union_truncates_to_limit() {
        let semantic: Vec<RankedResult> = (0..4)
            .map(|i| hit(Uuid::new_v4(), 0.9 - i as f32 * 0.01, ScoreType::Semantic))
            .collect();
        let lexical: Vec<RankedResult> = (0..4)
            .map(|i| hit(Uuid::new_v4(), 3.0 - i as f32 * 0.1, ScoreType::Lexical))
            .collect();

        let results = merge_ranked(semantic, lexical, 5);
        assert_eq!(results.len(), 5);
    }
}
