//! Shared LLM service with a `completion` profile and an optional `embedding`
//! profile.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Provider clients are built eagerly, so a bad config fails at startup
//!   rather than on the first request.
//! - [`LlmServiceProfiles::completion_only`] skips the embedding profile when
//!   vectors come from elsewhere; `embed` then fails with
//!   [`ConfigError::EmbeddingProfileDisabled`].
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::from_env()?);
//!
//! let txt = svc.generate("Hello world", None).await?;
//! let emb = svc.embed("Ferris").await?;
//! println!("{txt} / dim = {}", emb.len());
//! # Ok(()) }
//! ```

use tracing::info;

use crate::{
    config::{default_config, llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// One concrete provider client.
#[derive(Debug)]
enum ProviderClient {
    OpenAi(OpenAiService),
    Ollama(OllamaService),
}

impl ProviderClient {
    fn build(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::OpenAI => ProviderClient::OpenAi(OpenAiService::new(cfg.clone())?),
            LlmProvider::Ollama => ProviderClient::Ollama(OllamaService::new(cfg.clone())?),
        })
    }

    fn config(&self) -> &LlmModelConfig {
        match self {
            ProviderClient::OpenAi(c) => c.config(),
            ProviderClient::Ollama(c) => c.config(),
        }
    }
}

/// Shared service that manages the **completion** and **embedding** profiles.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    completion: ProviderClient,
    embedding: Option<ProviderClient>,
}

impl LlmServiceProfiles {
    /// Creates the service and both provider clients.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if either config is rejected by its client.
    pub fn new(completion: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        let completion = ProviderClient::build(&completion)?;
        let embedding = ProviderClient::build(&embedding)?;

        info!(
            completion_provider = %completion.config().provider,
            completion_model = %completion.config().model,
            embedding_provider = %embedding.config().provider,
            embedding_model = %embedding.config().model,
            "LLM profiles ready"
        );

        Ok(Self {
            completion,
            embedding: Some(embedding),
        })
    }

    /// Creates the service with the completion profile only.
    pub fn completion_only(completion: LlmModelConfig) -> Result<Self, AiLlmError> {
        let completion = ProviderClient::build(&completion)?;

        info!(
            completion_provider = %completion.config().provider,
            completion_model = %completion.config().model,
            "LLM completion profile ready, embeddings disabled"
        );

        Ok(Self {
            completion,
            embedding: None,
        })
    }

    /// Builds both profiles from environment (see [`default_config`]).
    pub fn from_env() -> Result<Self, AiLlmError> {
        Self::new(
            default_config::config_completion()?,
            default_config::config_embedding()?,
        )
    }

    /// Builds the completion profile from environment; embedding variables
    /// are not read.
    pub fn completion_only_from_env() -> Result<Self, AiLlmError> {
        Self::completion_only(default_config::config_completion()?)
    }

    /// Generates text using the **completion** profile.
    ///
    /// # Arguments
    /// - `prompt`: input text prompt.
    /// - `system`: optional system instruction.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match &self.completion {
            ProviderClient::OpenAi(c) => c.generate(prompt, system).await,
            ProviderClient::Ollama(c) => c.generate(prompt, system).await,
        }
    }

    /// Computes embeddings using the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding {
            Some(ProviderClient::OpenAi(c)) => c.embeddings(input).await,
            Some(ProviderClient::Ollama(c)) => c.embeddings(input).await,
            None => Err(ConfigError::EmbeddingProfileDisabled.into()),
        }
    }

    pub fn completion_profile(&self) -> &LlmModelConfig {
        self.completion.config()
    }

    /// `None` for a service built with [`LlmServiceProfiles::completion_only`].
    pub fn embedding_profile(&self) -> Option<&LlmModelConfig> {
        self.embedding.as_ref().map(ProviderClient::config)
    }
}
