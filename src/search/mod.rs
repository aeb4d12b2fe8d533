//! Hybrid retrieval: lexical + semantic search over the document store,
//! merged into a single ranking.

pub mod retrieval;
