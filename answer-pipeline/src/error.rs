//! Typed error for the answer-pipeline crate.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading, splitting or indexing the knowledge base failed (startup only).
    #[error("knowledge base error: {0}")]
    KnowledgeBase(#[from] rag_base::RagBaseError),

    /// Question embedding or vector search failed.
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    /// The completion provider returned an error.
    #[error("completion failed: {0}")]
    Completion(String),

    /// A stage did not finish within its budget.
    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: &'static str, after: Duration },

    /// Invalid runtime configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
