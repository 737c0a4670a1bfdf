//! Shared LLM service: provider clients (OpenAI, Ollama), env-driven model
//! configs and a two-profile facade (`completion` + `embedding`).
//!
//! Construct [`service_profiles::LlmServiceProfiles`] once at startup, wrap it
//! in `Arc` and hand clones to dependents.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use service_profiles::LlmServiceProfiles;
