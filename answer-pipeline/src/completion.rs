//! Completion seam between the pipeline and the LLM service.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;

use crate::error::PipelineError;

/// Boxed future returned by [`CompletionProvider::complete`].
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<String, PipelineError>> + Send + 'a>>;

/// Turns one fully assembled prompt into generated text.
pub trait CompletionProvider: Send + Sync {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a>;
}

/// Uses the `completion` profile of the shared LLM service.
///
/// The whole prompt goes out as a single user message; the persona instruction
/// is already part of it.
pub struct LlmCompleter {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmCompleter {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl CompletionProvider for LlmCompleter {
    fn complete<'a>(&'a self, prompt: &'a str) -> CompletionFuture<'a> {
        Box::pin(async move {
            self.svc
                .generate(prompt, None)
                .await
                .map_err(|e| PipelineError::Completion(e.to_string()))
        })
    }
}
