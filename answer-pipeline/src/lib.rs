//! Retrieval-augmented answering for a fixed persona.
//!
//! Public API: [`AnswerPipeline::answer`]. It embeds the question, takes the
//! top-K fragments from the persona's [`rag_base::VectorIndex`], builds the
//! prompt around the persona instruction and asks the completion model.
//! Failures come back as a fallback text in the question's language.

pub mod cfg;
pub mod completion;
pub mod error;
pub mod persona;
pub mod pipeline;
pub mod prompt;

pub use cfg::PipelineConfig;
pub use completion::{CompletionFuture, CompletionProvider, LlmCompleter};
pub use error::PipelineError;
pub use persona::Persona;
pub use pipeline::{AnswerPipeline, AnswerResult, FailureReason, PipelineStage};
