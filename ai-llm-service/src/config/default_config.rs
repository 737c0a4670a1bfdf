//! Default LLM configs loaded strictly from environment variables.
//!
//! Two roles are resolved for the provider selected by `LLM_KIND`:
//!
//! - **Completion** → chat model answering questions (deterministic, `temperature = 0`)
//! - **Embedding**  → embedding generator for the knowledge base and queries
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND` = `openai` (default) or `ollama`
//! - `LLM_MAX_TOKENS` = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = completion timeout (default 60)
//! - `EMBEDDING_TIMEOUT_SECS` = embedding timeout (default 30)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY` (mandatory)
//! - `OPENAI_URL` (default `https://api.openai.com`)
//! - `OPENAI_MODEL` (default `gpt-4.1-mini`)
//! - `OPENAI_EMBEDDING_MODEL` (default `text-embedding-ada-002`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)
//! - `OLLAMA_MODEL`                = chat model (mandatory)
//! - `EMBEDDING_MODEL`             = embedding model (mandatory)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt_u32, env_or, env_secs_or, must_env,
        validate_http_endpoint,
    },
};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Resolves `LLM_KIND`, defaulting to OpenAI.
pub fn llm_kind() -> Result<LlmProvider, AiLlmError> {
    Ok(env_or("LLM_KIND", "openai").parse::<LlmProvider>()?)
}

/// Completion config for the provider selected by `LLM_KIND`.
pub fn config_completion() -> Result<LlmModelConfig, AiLlmError> {
    match llm_kind()? {
        LlmProvider::OpenAI => config_openai_completion(),
        LlmProvider::Ollama => config_ollama_completion(),
    }
}

/// Embedding config for the provider selected by `LLM_KIND`.
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    match llm_kind()? {
        LlmProvider::OpenAI => config_openai_embedding(),
        LlmProvider::Ollama => config_ollama_embedding(),
    }
}

fn openai_endpoint() -> Result<String, AiLlmError> {
    let url = env_or("OPENAI_URL", DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &url)?;
    Ok(url)
}

/// Chat model on the OpenAI API.
///
/// # Defaults
/// - `temperature = Some(0.0)`
/// - `timeout_secs = Some(60)`
pub fn config_openai_completion() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_or("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(env_secs_or(
            "LLM_TIMEOUT_SECS",
            DEFAULT_COMPLETION_TIMEOUT_SECS,
        )?),
    })
}

/// Embedding model on the OpenAI API.
pub fn config_openai_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: env_or("OPENAI_EMBEDDING_MODEL", DEFAULT_OPENAI_EMBEDDING_MODEL),
        endpoint: openai_endpoint()?,
        api_key: Some(must_env("OPENAI_API_KEY")?),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(env_secs_or(
            "EMBEDDING_TIMEOUT_SECS",
            DEFAULT_EMBEDDING_TIMEOUT_SECS,
        )?),
    })
}

/// Resolves the Ollama endpoint strictly from environment.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Ok(url) = std::env::var("OLLAMA_URL") {
        if !url.trim().is_empty() {
            validate_http_endpoint("OLLAMA_URL", &url)?;
            return Ok(url);
        }
    }
    if let Ok(port) = std::env::var("OLLAMA_PORT") {
        if !port.trim().is_empty() {
            let _ = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: "expected u16 (1..=65535)",
                })?;
            return Ok(format!("http://localhost:{}", port.trim()));
        }
    }
    Err(AiLlmError::Config(ConfigError::MissingVar(
        "OLLAMA_URL or OLLAMA_PORT",
    )))
}

/// Chat model on a local Ollama runtime.
pub fn config_ollama_completion() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("OLLAMA_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: env_opt_u32("LLM_MAX_TOKENS")?,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(env_secs_or(
            "LLM_TIMEOUT_SECS",
            DEFAULT_COMPLETION_TIMEOUT_SECS,
        )?),
    })
}

/// Embedding model on a local Ollama runtime.
pub fn config_ollama_embedding() -> Result<LlmModelConfig, AiLlmError> {
    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model: must_env("EMBEDDING_MODEL")?,
        endpoint: ollama_endpoint()?,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(env_secs_or(
            "EMBEDDING_TIMEOUT_SECS",
            DEFAULT_EMBEDDING_TIMEOUT_SECS,
        )?),
    })
}
