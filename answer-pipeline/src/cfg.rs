//! Per-pipeline runtime knobs loaded from environment variables.

use std::time::Duration;

use crate::error::PipelineError;

pub const DEFAULT_RETRIEVAL_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_COMPLETION_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fragments fed into the prompt.
    pub top_k: usize,
    /// Budget for embedding the question and searching the index.
    pub retrieval_timeout: Duration,
    /// Budget for the completion call.
    pub completion_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            retrieval_timeout: Duration::from_secs(DEFAULT_RETRIEVAL_TIMEOUT_SECS),
            completion_timeout: Duration::from_secs(DEFAULT_COMPLETION_TIMEOUT_SECS),
        }
    }
}

impl PipelineConfig {
    /// Reads `RETRIEVAL_TIMEOUT_SECS` (default 30) and `COMPLETION_TIMEOUT_SECS`
    /// (default 90). `top_k` comes from the RAG configuration.
    pub fn from_env(top_k: usize) -> Result<Self, PipelineError> {
        let cfg = Self {
            top_k,
            retrieval_timeout: secs("RETRIEVAL_TIMEOUT_SECS", DEFAULT_RETRIEVAL_TIMEOUT_SECS)?,
            completion_timeout: secs("COMPLETION_TIMEOUT_SECS", DEFAULT_COMPLETION_TIMEOUT_SECS)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.top_k == 0 {
            return Err(PipelineError::Config("top_k must be > 0".into()));
        }
        if self.retrieval_timeout.is_zero() || self.completion_timeout.is_zero() {
            return Err(PipelineError::Config("stage timeouts must be > 0".into()));
        }
        Ok(())
    }
}

fn secs(key: &str, default: u64) -> Result<Duration, PipelineError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| PipelineError::Config(format!("{key} is not a number: '{v}'"))),
        _ => Ok(Duration::from_secs(default)),
    }
}
