//! # doc-rag
//!
//! Grounded question answering over operator-uploaded reference text.
//! An admin uploads text; it is chunked into overlapping word windows,
//! embedded, and stored. End users ask questions answered from that text
//! via hybrid retrieval plus a generative model.
//!
//! ## Pipeline
//!
//! ```text
//! Upload:  text ──► Chunker ──► Embedding Gateway ──► Document Store
//!
//! Query:   question ──► Embedding Gateway
//!                            │
//!               ┌────────────┴────────────┐
//!               ▼                         ▼
//!       Semantic search           Lexical search
//!       (cosine >= threshold)     (relevance >= min score)
//!               │                         │
//!               └────────────┬────────────┘
//!                            ▼
//!              Union + dedupe + rank + truncate
//!                            │
//!                            ▼
//!                     Answer Composer
//!              (grounded prompt, fallback text)
//! ```
//!
//! Every stage degrades gracefully: a missing generative provider or a
//! failed generation still returns the retrieved results with a fixed
//! fallback answer, and a query matching nothing is a success with empty
//! results, not an error.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, providers, and tuning
//! - [`error`] - Error taxonomy with HTTP status mapping
//! - [`models`] - Shared data types: `Chunk`, `RankedResult`, request/response types
//! - [`chunking`] - Word-window chunker and keyword derivation
//! - [`llm`] - Embedding and generative provider clients
//! - [`store`] - Document store: vector records plus full-text index
//! - [`search`] - The retrieval engine: hybrid search, merge, rank
//! - [`answer`] - Grounded answer composition with fallback cascade
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod answer;
pub mod api;
pub mod chunking;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod search;
pub mod state;
pub mod store;
