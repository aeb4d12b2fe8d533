//! HTTP clients for the external embedding and generative-answer providers.
//!
//! Both providers speak OpenAI-compatible APIs and are configured by a
//! credential. Whether a credential is present is decided once at
//! construction, so a missing key surfaces as `ProviderUnavailable` rather
//! than a confusing mid-request failure.

pub mod embeddings;
pub mod generate;

pub use embeddings::EmbeddingClient;
pub use generate::GenerativeClient;
