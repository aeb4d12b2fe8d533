//! Axum HTTP handlers for search and document administration.

pub mod documents;
pub mod search;
