use std::{collections::HashMap, sync::Arc};

use ai_llm_service::{AiLlmError, LlmServiceProfiles};
use answer_pipeline::{AnswerPipeline, CompletionProvider, LlmCompleter, PipelineConfig};
use rag_base::{
    EmbeddingBackend, EmbeddingsProvider, HashingEmbedder, IndexConfig, KnowledgeBaseLoader,
    KnowledgeSource, LlmEmbedder, RagConfig,
};
use signature_auth::{ClientRegistry, SignatureAuthenticator};
use tracing::info;

use crate::{
    core::app_config::{AppConfig, ConfigError},
    error_handler::AppError,
};

/// Shared state for all HTTP handlers. Built once before the listener binds;
/// read-only afterwards.
pub struct AppState {
    pub config: AppConfig,
    pub authenticator: SignatureAuthenticator,
    /// One pipeline per enabled persona, keyed by route segment.
    pipelines: HashMap<String, AnswerPipeline>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        authenticator: SignatureAuthenticator,
        pipelines: Vec<AnswerPipeline>,
    ) -> Self {
        let pipelines = pipelines
            .into_iter()
            .map(|p| (p.persona().key.clone(), p))
            .collect();
        Self {
            config,
            authenticator,
            pipelines,
        }
    }

    /// Reads every setting, connects the LLM clients and builds one indexed
    /// pipeline per configured knowledge source. Any failure is fatal.
    pub async fn from_env() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;

        let clients = std::env::var("AUTH_CLIENTS")
            .map_err(|_| ConfigError::Missing("AUTH_CLIENTS"))?;
        let registry = ClientRegistry::parse(&clients)?;
        info!(clients = registry.len(), "client registry loaded");
        let authenticator = SignatureAuthenticator::new(registry);

        let rag = RagConfig::from_env()?;
        let pipeline_cfg = PipelineConfig::from_env(rag.top_k)?;

        let llm = Arc::new(llm_profiles(rag.embedding.backend)?);
        let embedder: Arc<dyn EmbeddingsProvider> = match rag.embedding.backend {
            EmbeddingBackend::Llm => Arc::new(LlmEmbedder::new(llm.clone())?),
            EmbeddingBackend::Hashing => {
                Arc::new(HashingEmbedder::new(rag.embedding.dim.unwrap_or(256))?)
            }
        };
        info!(
            completion = %llm.completion_profile().model,
            embedder = embedder.model_id(),
            "models ready"
        );
        let completer: Arc<dyn CompletionProvider> = Arc::new(LlmCompleter::new(llm));

        let loader = KnowledgeBaseLoader::new(&rag.loader)?;
        let index_cfg = IndexConfig {
            concurrency: rag.embedding.concurrency,
            expected_dim: rag.embedding.dim,
        };

        let mut pipelines = Vec::with_capacity(config.knowledge_sources.len());
        for (persona, raw) in &config.knowledge_sources {
            let source = KnowledgeSource::parse(raw)?;
            let pipeline = AnswerPipeline::from_source(
                persona.clone(),
                &source,
                &loader,
                embedder.clone(),
                completer.clone(),
                pipeline_cfg.clone(),
                &index_cfg,
            )
            .await?;
            pipelines.push(pipeline);
        }

        Ok(Self::new(config, authenticator, pipelines))
    }

    pub fn pipeline(&self, persona: &str) -> Option<&AnswerPipeline> {
        self.pipelines.get(persona)
    }

    /// Route keys of the enabled personas, sorted.
    pub fn personas(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.pipelines.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// The embedding profile (and its variables, such as `OPENAI_API_KEY` for the
/// OpenAI embedding model) is only read when vectors come from the LLM service.
fn llm_profiles(backend: EmbeddingBackend) -> Result<LlmServiceProfiles, AiLlmError> {
    match backend {
        EmbeddingBackend::Llm => LlmServiceProfiles::from_env(),
        EmbeddingBackend::Hashing => LlmServiceProfiles::completion_only_from_env(),
    }
}
