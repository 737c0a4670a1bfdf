//! Knowledge-base loading: local UTF-8 files and Google Docs plain-text exports.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::LazyLock,
    time::{Duration, Instant},
};

use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{errors::rag_base_error::RagBaseError, structs::rag_base_config::LoaderConfig};

static GOOGLE_DOC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/document/d/([a-zA-Z0-9_-]+)").expect("document id pattern is a valid regex")
});

/// Where a knowledge base comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeSource {
    LocalFile(PathBuf),
    GoogleDoc { id: String },
}

impl KnowledgeSource {
    /// Classifies a configured source string.
    ///
    /// Strings starting with `http://` or `https://` must contain
    /// `/document/d/<id>`; anything else is treated as a local path.
    ///
    /// ```
    /// use rag_base::loader::KnowledgeSource;
    ///
    /// let s = KnowledgeSource::parse("https://docs.google.com/document/d/19ULh-x_1/edit").unwrap();
    /// assert_eq!(s, KnowledgeSource::GoogleDoc { id: "19ULh-x_1".into() });
    /// assert!(KnowledgeSource::parse("https://example.com/file.txt").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, RagBaseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RagBaseError::InvalidSource("empty source".into()));
        }

        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let id = GOOGLE_DOC_RE
                .captures(raw)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or_else(|| {
                    RagBaseError::InvalidSource(format!("not a Google Docs document URL: {raw}"))
                })?;
            return Ok(KnowledgeSource::GoogleDoc { id });
        }

        Ok(KnowledgeSource::LocalFile(PathBuf::from(raw)))
    }
}

impl fmt::Display for KnowledgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeSource::LocalFile(p) => write!(f, "file {}", p.display()),
            KnowledgeSource::GoogleDoc { id } => write!(f, "google doc {id}"),
        }
    }
}

/// Reads raw knowledge-base text. One GET per remote load, no retries.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseLoader {
    client: reqwest::Client,
    export_base: String,
    timeout: Duration,
}

impl KnowledgeBaseLoader {
    pub fn new(cfg: &LoaderConfig) -> Result<Self, RagBaseError> {
        let client = reqwest::Client::builder()
            .timeout(cfg.fetch_timeout)
            .build()
            .map_err(|e| RagBaseError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self {
            client,
            export_base: cfg.export_base.trim_end_matches('/').to_string(),
            timeout: cfg.fetch_timeout,
        })
    }

    /// Export URL for a document id.
    pub fn export_url(&self, id: &str) -> String {
        format!("{}/document/d/{id}/export?format=txt", self.export_base)
    }

    /// Loads the raw text of `source`. A leading byte-order mark is dropped.
    ///
    /// # Errors
    /// [`RagBaseError::Read`] with the origin and cause when the file cannot be
    /// read or decoded, or the export request fails or returns a non-2xx status.
    #[instrument(skip_all, fields(source = %source))]
    pub async fn load(&self, source: &KnowledgeSource) -> Result<String, RagBaseError> {
        let started = Instant::now();
        let text = match source {
            KnowledgeSource::LocalFile(path) => read_local(path).await?,
            KnowledgeSource::GoogleDoc { id } => self.fetch_google_doc(id).await?,
        };
        let text = strip_bom(text);

        info!(
            chars = text.chars().count(),
            elapsed_ms = started.elapsed().as_millis(),
            "knowledge base loaded"
        );
        Ok(text)
    }

    async fn fetch_google_doc(&self, id: &str) -> Result<String, RagBaseError> {
        let url = self.export_url(id);
        let read_err = |reason: String| RagBaseError::Read {
            origin: url.clone(),
            reason,
        };

        let resp = self.client.get(&url).send().await.map_err(|e| {
            warn!(error = %e, %url, "export request failed");
            if e.is_timeout() {
                read_err(format!("timed out after {:?}", self.timeout))
            } else {
                read_err(e.to_string())
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, %url, "export returned non-success status");
            return Err(read_err(format!("HTTP {status}")));
        }

        resp.text().await.map_err(|e| read_err(e.to_string()))
    }
}

async fn read_local(path: &Path) -> Result<String, RagBaseError> {
    let origin = || path.display().to_string();
    let bytes = tokio::fs::read(path).await.map_err(|e| RagBaseError::Read {
        origin: origin(),
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| RagBaseError::Read {
        origin: origin(),
        reason: format!("not valid UTF-8: {e}"),
    })
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
