//! Unified error type for the rag-base crate.

use thiserror::Error;

/// Errors produced by the RAG base module.
#[derive(Debug, Error)]
pub enum RagBaseError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration combination is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Knowledge source ────────────────────────────────────────────────────
    /// The source string is neither a usable path nor a Google Docs document URL.
    #[error("invalid knowledge source: {0}")]
    InvalidSource(String),

    /// The source exists but its content could not be obtained or decoded.
    #[error("failed to read knowledge source {origin}: {reason}")]
    Read { origin: String, reason: String },

    // ── Embeddings backend ──────────────────────────────────────────────────
    /// Embedding backend failed to embed an input.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Vectors of different dimensionality met in one index.
    #[error("embedding dim {got} != expected {expected}")]
    VectorSizeMismatch { expected: usize, got: usize },
}
