//! HTTP-side settings read from the environment at startup.

use std::path::PathBuf;

use answer_pipeline::Persona;
use axum::http::HeaderValue;
use thiserror::Error;

pub const DEFAULT_CORS_ORIGINS: &str = "https://projectsolution.kz,https://pmi.org.kz";
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("no knowledge base configured: set at least one of {0}")]
    NoKnowledgeBase(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `host:port` to bind.
    pub api_address: String,
    pub cors_allowed_origins: Vec<HeaderValue>,
    /// Directory for `/upload_file`; created on first upload.
    pub upload_dir: PathBuf,
    /// Request body cap, multipart uploads included.
    pub upload_max_bytes: usize,
    /// Enabled personas with their raw knowledge-source strings.
    pub knowledge_sources: Vec<(Persona, String)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_address: "127.0.0.1:8000".into(),
            cors_allowed_origins: DEFAULT_CORS_ORIGINS
                .split(',')
                .map(HeaderValue::from_static)
                .collect(),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            knowledge_sources: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Environment variables used:
    /// - `API_ADDRESS` (required)
    /// - `CORS_ALLOWED_ORIGINS` (comma-separated)
    /// - `UPLOAD_DIR`, `UPLOAD_MAX_BYTES`
    /// - `KB_<PERSONA>_SOURCE` per built-in persona, e.g. `KB_OPENAI_SOURCE`
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_address = non_empty("API_ADDRESS").ok_or(ConfigError::Missing("API_ADDRESS"))?;

        let origins = non_empty("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string());
        let cors_allowed_origins = parse_origins(&origins)?;

        let upload_dir = non_empty("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let upload_max_bytes = match non_empty("UPLOAD_MAX_BYTES") {
            Some(v) => v.parse::<usize>().map_err(|e| ConfigError::Invalid {
                var: "UPLOAD_MAX_BYTES".into(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_UPLOAD_MAX_BYTES,
        };

        let mut knowledge_sources = Vec::new();
        let mut vars = Vec::new();
        for persona in Persona::builtin() {
            let var = source_var(&persona.key);
            if let Some(raw) = non_empty(&var) {
                knowledge_sources.push((persona, raw));
            }
            vars.push(var);
        }
        if knowledge_sources.is_empty() {
            return Err(ConfigError::NoKnowledgeBase(vars.join(", ")));
        }

        Ok(Self {
            api_address,
            cors_allowed_origins,
            upload_dir,
            upload_max_bytes,
            knowledge_sources,
        })
    }
}

/// `openai` → `KB_OPENAI_SOURCE`.
pub fn source_var(persona_key: &str) -> String {
    format!("KB_{}_SOURCE", persona_key.to_ascii_uppercase())
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s == "*" {
                return Err(ConfigError::Invalid {
                    var: "CORS_ALLOWED_ORIGINS".into(),
                    reason: "`*` cannot be combined with credentials; list origins".into(),
                });
            }
            HeaderValue::from_str(s).map_err(|e| ConfigError::Invalid {
                var: "CORS_ALLOWED_ORIGINS".into(),
                reason: format!("{s}: {e}"),
            })
        })
        .collect()
}

fn non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_var_is_upper_snake() {
        assert_eq!(source_var("qazpmichapter"), "KB_QAZPMICHAPTER_SOURCE");
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let v = parse_origins(" https://a.kz , ,https://b.kz").unwrap();
        let v: Vec<&str> = v.iter().map(|h| h.to_str().unwrap()).collect();
        assert_eq!(v, ["https://a.kz", "https://b.kz"]);
        assert!(parse_origins("https://bad\nvalue").is_err());
        assert!(parse_origins("https://a.kz,*").is_err());
    }

    #[test]
    fn default_origins_match_public_sites() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.cors_allowed_origins.len(), 2);
        assert_eq!(cfg.upload_dir, PathBuf::from("./uploads"));
    }
}
