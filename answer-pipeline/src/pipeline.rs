//! Question → answer state machine.
//!
//! `Idle → Retrieving → PromptAssembling → Completing → Done`, where any
//! stage may end in `Failed`. Each stage runs once under its own timeout.

use std::{sync::Arc, time::Instant};

use rag_base::{
    EmbeddingsProvider, IndexConfig, KnowledgeBaseLoader, KnowledgeSource, VectorIndex,
    prepare_fragments,
};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    cfg::PipelineConfig, completion::CompletionProvider, error::PipelineError, persona::Persona,
    prompt::build_prompt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    RetrievalError,
    CompletionError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Retrieving,
    PromptAssembling,
    Completing,
    Done,
    Failed(FailureReason),
}

/// Outcome of one question. Failures carry only a user-safe fallback text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerResult {
    Answered {
        text: String,
    },
    Failed {
        reason: FailureReason,
        fallback: String,
    },
}

impl AnswerResult {
    /// Text to show the user: the answer or the fallback.
    pub fn text(&self) -> &str {
        match self {
            AnswerResult::Answered { text } => text,
            AnswerResult::Failed { fallback, .. } => fallback,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AnswerResult::Answered { text } => text,
            AnswerResult::Failed { fallback, .. } => fallback,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, AnswerResult::Answered { .. })
    }
}

/// One persona's knowledge base, index and completion backend.
///
/// Immutable after construction; `answer` takes `&self` and may run concurrently.
pub struct AnswerPipeline {
    persona: Persona,
    index: VectorIndex,
    completer: Arc<dyn CompletionProvider>,
    cfg: PipelineConfig,
}

impl AnswerPipeline {
    pub fn new(
        persona: Persona,
        index: VectorIndex,
        completer: Arc<dyn CompletionProvider>,
        cfg: PipelineConfig,
    ) -> Self {
        Self {
            persona,
            index,
            completer,
            cfg,
        }
    }

    /// Startup constructor: load the source, convert to markdown, split and index.
    ///
    /// # Errors
    /// [`PipelineError::KnowledgeBase`] when the source cannot be read or the
    /// index cannot be built. Callers treat it as fatal.
    #[instrument(skip_all, fields(persona = %persona.key, source = %source))]
    pub async fn from_source(
        persona: Persona,
        source: &KnowledgeSource,
        loader: &KnowledgeBaseLoader,
        embedder: Arc<dyn EmbeddingsProvider>,
        completer: Arc<dyn CompletionProvider>,
        cfg: PipelineConfig,
        index_cfg: &IndexConfig,
    ) -> Result<Self, PipelineError> {
        let raw = loader.load(source).await?;
        let fragments = prepare_fragments(&raw);
        if fragments.is_empty() {
            warn!("knowledge base produced no fragments");
        }

        let index = VectorIndex::build(fragments, embedder, index_cfg).await?;
        info!(fragments = index.len(), "pipeline ready");

        Ok(Self::new(persona, index, completer, cfg))
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Answers `question`. Never returns internal error details: failures are
    /// logged and replaced by the persona fallback in the question's language.
    #[instrument(skip_all, fields(persona = %self.persona.key))]
    pub async fn answer(&self, question: &str) -> AnswerResult {
        let started = Instant::now();
        let mut stage = PipelineStage::Idle;

        match self.run(question, &mut stage).await {
            Ok(text) => {
                advance(&mut stage, PipelineStage::Done);
                info!(
                    elapsed_ms = started.elapsed().as_millis(),
                    chars = text.chars().count(),
                    "answered"
                );
                AnswerResult::Answered { text }
            }
            Err((reason, err)) => {
                error!(error = %err, ?reason, elapsed_ms = started.elapsed().as_millis(), "answer failed");
                advance(&mut stage, PipelineStage::Failed(reason));
                AnswerResult::Failed {
                    reason,
                    fallback: self.persona.fallback_for(question).to_string(),
                }
            }
        }
    }

    async fn run(
        &self,
        question: &str,
        stage: &mut PipelineStage,
    ) -> Result<String, (FailureReason, PipelineError)> {
        advance(stage, PipelineStage::Retrieving);
        let after = self.cfg.retrieval_timeout;
        let hits = timeout(after, self.index.query(question, self.cfg.top_k))
            .await
            .map_err(|_| PipelineError::Timeout {
                stage: "retrieving",
                after,
            })
            .and_then(|r| r.map_err(|e| PipelineError::Retrieval(e.to_string())))
            .map_err(|e| (FailureReason::RetrievalError, e))?;
        debug!(
            hits = hits.len(),
            fragments = ?hits.iter().map(|h| h.fragment.index).collect::<Vec<_>>(),
            "context retrieved"
        );

        advance(stage, PipelineStage::PromptAssembling);
        let prompt = build_prompt(&self.persona, &hits, question);

        advance(stage, PipelineStage::Completing);
        let after = self.cfg.completion_timeout;
        timeout(after, self.completer.complete(&prompt))
            .await
            .map_err(|_| PipelineError::Timeout {
                stage: "completing",
                after,
            })
            .and_then(|r| r)
            .map_err(|e| (FailureReason::CompletionError, e))
    }
}

fn advance(stage: &mut PipelineStage, next: PipelineStage) {
    debug!(from = ?*stage, to = ?next, "stage");
    *stage = next;
}
