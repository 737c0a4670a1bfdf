//! Configuration layer: reads runtime settings from environment variables
//! and exposes strongly typed configs for loading, embedding and retrieval.

use std::time::Duration;

use crate::errors::rag_base_error::RagBaseError;

pub const DEFAULT_EXPORT_BASE: &str = "https://docs.google.com";

/// Which embedder backs the vector index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Embedding model of the configured LLM provider.
    Llm,
    /// Local deterministic token-hashing embedder (no network).
    Hashing,
}

impl EmbeddingBackend {
    fn parse(key: &str, raw: &str) -> Result<Self, RagBaseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "llm" | "" => Ok(EmbeddingBackend::Llm),
            "hashing" | "hash" => Ok(EmbeddingBackend::Hashing),
            _ => Err(RagBaseError::EnvParse {
                key: key.into(),
                value: raw.into(),
            }),
        }
    }
}

/// Embedding configuration (backend, dimension check and concurrency).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Expected vector dimensionality; `None` accepts whatever the model returns.
    /// Required (and used as the vector size) for the hashing backend.
    pub dim: Option<usize>,
    /// Max concurrent embedding requests while building an index.
    pub concurrency: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Llm,
            dim: None,
            concurrency: 4,
        }
    }
}

/// Knowledge source fetching.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Base URL of the Google Docs export endpoint (overridable for tests/mirrors).
    pub export_base: String,
    /// Timeout for the remote export request.
    pub fetch_timeout: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            export_base: DEFAULT_EXPORT_BASE.to_string(),
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

/// Top-level runtime configuration for the RAG module.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Fragments passed to the prompt per question.
    pub top_k: usize,
    pub embedding: EmbeddingConfig,
    pub loader: LoaderConfig,
}

impl RagConfig {
    /// Build configuration from environment variables.
    ///
    /// Environment variables used:
    /// - `RAG_TOP_K` (default: 4)
    /// - `EMBEDDING_KIND` (values: "llm" | "hashing"; default: "llm")
    /// - `EMBEDDING_DIM` (optional; default 256 for the hashing backend)
    /// - `EMBEDDING_CONCURRENCY` (default: 4)
    /// - `GOOGLE_DOCS_EXPORT_BASE` (default: "https://docs.google.com")
    /// - `KB_FETCH_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, RagBaseError> {
        let backend = match std::env::var("EMBEDDING_KIND") {
            Ok(v) => EmbeddingBackend::parse("EMBEDDING_KIND", &v)?,
            Err(_) => EmbeddingBackend::Llm,
        };

        let mut dim = read_opt_usize_env("EMBEDDING_DIM")?;
        if backend == EmbeddingBackend::Hashing && dim.is_none() {
            dim = Some(256);
        }

        let embedding = EmbeddingConfig {
            backend,
            dim,
            concurrency: read_usize_env("EMBEDDING_CONCURRENCY", 4)?,
        };

        let loader = LoaderConfig {
            export_base: std::env::var("GOOGLE_DOCS_EXPORT_BASE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EXPORT_BASE.into()),
            fetch_timeout: Duration::from_secs(read_u64_env("KB_FETCH_TIMEOUT_SECS", 30)?),
        };

        let cfg = Self {
            top_k: read_usize_env("RAG_TOP_K", 4)?,
            embedding,
            loader,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Basic validations.
    pub fn validate(&self) -> Result<(), RagBaseError> {
        if self.top_k == 0 {
            return Err(RagBaseError::InvalidConfig("RAG_TOP_K must be > 0".into()));
        }
        if self.embedding.concurrency == 0 {
            return Err(RagBaseError::InvalidConfig(
                "EMBEDDING_CONCURRENCY must be > 0".into(),
            ));
        }
        if self.embedding.dim == Some(0) {
            return Err(RagBaseError::InvalidConfig(
                "EMBEDDING_DIM must be > 0".into(),
            ));
        }
        if self.loader.fetch_timeout.is_zero() {
            return Err(RagBaseError::InvalidConfig(
                "KB_FETCH_TIMEOUT_SECS must be > 0".into(),
            ));
        }
        if !(self.loader.export_base.starts_with("http://")
            || self.loader.export_base.starts_with("https://"))
        {
            return Err(RagBaseError::InvalidConfig(
                "GOOGLE_DOCS_EXPORT_BASE must start with http:// or https://".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            embedding: EmbeddingConfig::default(),
            loader: LoaderConfig::default(),
        }
    }
}

/// Read a `usize` from env, `default` when unset, error when unparsable.
fn read_usize_env(key: &str, default: usize) -> Result<usize, RagBaseError> {
    Ok(read_opt_usize_env(key)?.unwrap_or(default))
}

fn read_opt_usize_env(key: &str) -> Result<Option<usize>, RagBaseError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim()
                .parse::<usize>()
                .map(Some)
                .map_err(|_| RagBaseError::EnvParse {
                    key: key.into(),
                    value: v,
                })
        }
        _ => Ok(None),
    }
}

fn read_u64_env(key: &str, default: u64) -> Result<u64, RagBaseError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => {
            v.trim().parse::<u64>().map_err(|_| RagBaseError::EnvParse {
                key: key.into(),
                value: v,
            })
        }
        _ => Ok(default),
    }
}
