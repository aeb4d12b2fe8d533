//! Word-window chunker for uploaded reference text.
//!
//! Uploaded text is split on whitespace and cut into fixed-size windows that
//! advance by `chunk_size - overlap` words, so consecutive chunks share an
//! overlap region and no word is dropped between them.

use std::collections::HashSet;

use crate::config::ChunkingConfig;
use crate::error::Error;

/// Split `text` into overlapping word windows.
///
/// The last window that reaches the end of the word sequence is emitted and
/// iteration stops, so there is never an empty trailing chunk. Text shorter
/// than `chunk_size` words yields exactly one chunk equal to the whole text.
pub fn chunk_words(text: &str, config: &ChunkingConfig) -> Result<Vec<String>, Error> {
    if config.chunk_size == 0 {
        return Err(Error::Config("chunk_size must be at least 1".to_string()));
    }
    if config.overlap >= config.chunk_size {
        return Err(Error::Config(format!(
            "overlap ({}) must be smaller than chunk_size ({})",
            config.overlap, config.chunk_size
        )));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let stride = config.chunk_size - config.overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let end = (start + config.chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end >= words.len() {
            break;
        }
        start += stride;
    }

    Ok(chunks)
}

/// Derive lowercase keyword tags from a chunk's text.
///
/// Tokens are split at non-word characters, kept only when longer than two
/// characters, and deduplicated.
pub fn derive_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
    {
        if token.len() > 2 && seen.insert(token.to_string()) {
            keywords.push(token.to_string());
        }
    }

    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size,
            overlap,
        }
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_short_text_yields_single_chunk() {
        let chunks = chunk_words("one two three", &config(100, 20)).unwrap();
        assert_eq!(chunks, vec!["one two three".to_string()]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_words("", &config(100, 20)).unwrap().is_empty());
        assert!(chunk_words("  \n\t ", &config(100, 20)).unwrap().is_empty());
    }

    #[test]
    fn test_250_words_make_three_chunks() {
        let text = words(250);
        let chunks = chunk_words(&text, &config(100, 20)).unwrap();
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.split_whitespace().count() <= 100);
        }
        // Windows start at 0, 80, 160
        assert!(chunks[0].starts_with("w0 "));
        assert!(chunks[1].starts_with("w80 "));
        assert!(chunks[2].starts_with("w160 "));
        assert!(chunks[2].ends_with("w249"));
    }

    #[test]
    fn test_consecutive_chunks_share_overlap() {
        let text = words(250);
        let chunks = chunk_words(&text, &config(100, 20)).unwrap();
        for pair in chunks.windows(2) {
            let left: Vec<&str> = pair[0].split_whitespace().collect();
            let right: Vec<&str> = pair[1].split_whitespace().collect();
            let shared = left.iter().filter(|w| right.contains(w)).count();
            assert!(shared >= 20, "expected >= 20 shared words, got {shared}");
        }
    }

    #[test]
    fn test_no_word_dropped() {
        // The stride-aligned leading portions of each window, plus the tail of
        // the final window, reconstruct the original sequence exactly.
        let text = words(237);
        let chunks = chunk_words(&text, &config(100, 20)).unwrap();
        let stride = 80;

        let mut reconstructed: Vec<String> = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let chunk_words: Vec<&str> = chunk.split_whitespace().collect();
            if i + 1 < chunks.len() {
                reconstructed.extend(chunk_words[..stride].iter().map(|w| w.to_string()));
            } else {
                reconstructed.extend(chunk_words.iter().map(|w| w.to_string()));
            }
        }
        let original: Vec<String> = text.split_whitespace().map(|w| w.to_string()).collect();
        assert_eq!(reconstructed, original);
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = words(321);
        let a = chunk_words(&text, &config(100, 20)).unwrap();
        let b = chunk_words(&text, &config(100, 20)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_exact_boundary_emits_no_empty_chunk() {
        // 100 words with stride 80: second window [80..100] is the last
        let text = words(100);
        let chunks = chunk_words(&text, &config(100, 20)).unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_overlap_equal_to_chunk_size_rejected() {
        let err = chunk_words("a b c", &config(10, 10)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_overlap_partitions_exactly() {
        let text = words(30);
        let chunks = chunk_words(&text, &config(10, 0)).unwrap();
        assert_eq!(chunks.len(), 3);
        let rejoined = chunks.join(" ");
        assert_eq!(rejoined, text);
    }

    #[test]
    fn test_keywords_lowercase_and_deduplicated() {
        let keywords = derive_keywords("The Council met; the council voted.");
        assert_eq!(keywords, vec!["the", "council", "met", "voted"]);
    }

    #[test]
    fn test_keywords_drop_short_tokens() {
        let keywords = derive_keywords("an ox ran far");
        assert_eq!(keywords, vec!["ran", "far"]);
    }

    #[test]
    fn test_keywords_split_on_punctuation() {
        let keywords = derive_keywords("hybrid-retrieval, ranking/merging");
        assert_eq!(keywords, vec!["hybrid", "retrieval", "ranking", "merging"]);
    }
}
