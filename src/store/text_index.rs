use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexWriter, ReloadPolicy, TantivyDocument};
use uuid::Uuid;

use crate::error::Error;
use crate::models::Chunk;

/// Full-text index over chunk text, keywords, and title, built on tantivy.
/// Only the chunk id is stored; hits are resolved against the record store.
pub struct TextIndex {
    index: Index,
    f_id: tantivy::schema::Field,
    f_title: tantivy::schema::Field,
    f_text: tantivy::schema::Field,
    f_keywords: tantivy::schema::Field,
}

impl TextIndex {
    /// Create or open the index at the given directory.
    pub fn open_or_create(index_dir: &Path) -> Result<Self, Error> {
        std::fs::create_dir_all(index_dir).map_err(|e| Error::Store(e.to_string()))?;

        let mut schema_builder = Schema::builder();
        let f_id = schema_builder.add_text_field("id", STRING | STORED);
        let f_title = schema_builder.add_text_field("title", TEXT);
        let f_text = schema_builder.add_text_field("text", TEXT);
        let f_keywords = schema_builder.add_text_field("keywords", TEXT);
        let schema = schema_builder.build();

        let index = if index_dir.join("meta.json").exists() {
            Index::open_in_dir(index_dir)?
        } else {
            Index::create_in_dir(index_dir, schema)?
        };

        Ok(Self {
            index,
            f_id,
            f_title,
            f_text,
            f_keywords,
        })
    }

    /// Index a batch of chunks in one commit.
    pub fn index_chunks(&self, chunks: &[Chunk]) -> Result<(), Error> {
        let mut writer: IndexWriter = self.index.writer(50_000_000)?;

        for chunk in chunks {
            writer.add_document(doc!(
                self.f_id => chunk.id.to_string(),
                self.f_title => chunk.title.clone(),
                self.f_text => chunk.text.clone(),
                self.f_keywords => chunk.keywords.join(" "),
            ))?;
        }

        writer.commit()?;
        Ok(())
    }

    /// Delete one chunk's document.
    pub fn delete(&self, id: Uuid) -> Result<(), Error> {
        let mut writer: IndexWriter = self.index.writer(50_000_000)?;
        let term = tantivy::Term::from_field_text(self.f_id, &id.to_string());
        writer.delete_term(term);
        writer.commit()?;
        Ok(())
    }

    /// Relevance-ranked chunk ids for a free-form query, highest score first.
    ///
    /// The query is parsed leniently: user questions contain punctuation that
    /// is not valid query syntax, and a partial parse beats a 500.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<(Uuid, f32)>, Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let reader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e: tantivy::TantivyError| Error::Store(e.to_string()))?;

        let searcher = reader.searcher();
        let query_parser = QueryParser::for_index(
            &self.index,
            vec![self.f_text, self.f_keywords, self.f_title],
        );
        let (parsed, _errors) = query_parser.parse_query_lenient(query);

        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(limit))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;
            let id_str = doc
                .get_first(self.f_id)
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            match Uuid::parse_str(id_str) {
                Ok(id) => hits.push((id, score)),
                Err(_) => continue,
            }
        }

        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn chunk(title: &str, text: &str, keywords: &[&str]) -> Chunk {
        Chunk {
            id: Uuid::new_v4(),
            title: title.into(),
            text: text.into(),
            chunk_index: 0,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            embedding: vec![0.1],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_index_and_search_by_text() {
        let dir = tempfile::tempdir().unwrap();
        let index = TextIndex::open_or_create(dir.path()).unwrap();

        let a = chunk("bylaws", "the council votes every spring on membership", &[]);
        let b = chunk("history", "the society was founded decades ago", &[]);
        let a_id = a.id;
        index.index_chunks(&[a, b]).unwrap();

        let hits = index.search("council votes", 10).unwrap();
        assert!(!hits.is_empty());
        assert_eq!(hits[0].0, a_id);
    }

    #[test]
    fn test_search_matches_keywords_field() {
        let dir = tempfile::tempdir().unwrap();
        let index = TextIndex::open_or_create(dir.path()).unwrap();

        let c = chunk("notes", "unrelated body", &["innovation", "mentorship"]);
        let id = c.id;
        index.index_chunks(&[c]).unwrap();

        let hits = index.search("mentorship", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, id);
    }

    #[test]
    fn test_punctuated_question_does_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = TextIndex::open_or_create(dir.path()).unwrap();
        index
            .index_chunks(&[chunk("t", "student innovation program", &[])])
            .unwrap();

        let hits = index.search("What is the innovation program?", 10).unwrap();
        assert!(!hits.is_empty());
    }

    #[test]
    fn test_delete_removes_document() {
        let dir = tempfile::tempdir().unwrap();
        let index = TextIndex::open_or_create(dir.path()).unwrap();

        let c = chunk("t", "ephemeral entry", &[]);
        let id = c.id;
        index.index_chunks(&[c]).unwrap();
        assert!(!index.search("ephemeral", 10).unwrap().is_empty());

        index.delete(id).unwrap();
        assert!(index.search("ephemeral", 10).unwrap().is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = TextIndex::open_or_create(dir.path()).unwrap();
        index
            .index_chunks(&[chunk("t", "some stored text", &[])])
            .unwrap();

        let hits = index.search("zzzqqqxxx", 10).unwrap();
        assert!(hits.is_empty());
    }
}
