use std::{future::Future, pin::Pin};

use crate::errors::rag_base_error::RagBaseError;

pub mod hashing;
pub mod llm;

pub use hashing::HashingEmbedder;
pub use llm::LlmEmbedder;

/// Boxed future returned by [`EmbeddingsProvider::embed`].
pub type EmbedFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<f32>, RagBaseError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Async is required because most real providers perform HTTP requests.
/// A [`crate::vector_index::VectorIndex`] keeps the provider it was built
/// with and embeds queries through the same instance.
pub trait EmbeddingsProvider: Send + Sync {
    /// Embeds one text.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a>;

    /// Identifier of the underlying model, for logs and diagnostics.
    fn model_id(&self) -> &str;
}
