//! JSON-over-HTTP round trip shared by the provider clients.

use std::time::{Duration, Instant};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::{
    config::llm_provider::LlmProvider,
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// One provider endpoint: the client carries timeout and default headers.
pub(crate) struct Endpoint<'a> {
    pub client: &'a reqwest::Client,
    pub provider: LlmProvider,
    pub url: &'a str,
    pub timeout: Duration,
}

impl Endpoint<'_> {
    /// POSTs `body` and decodes the reply as `R`.
    ///
    /// Non-2xx becomes `HttpStatus` with a body snippet; an undecodable reply
    /// becomes `Decode` mentioning `expected`.
    pub(crate) async fn post_json<B, R>(&self, body: &B, expected: &str) -> Result<R, AiLlmError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let started = Instant::now();
        debug!(provider = %self.provider, "POST {}", self.url);

        let resp = self
            .client
            .post(self.url)
            .json(body)
            .send()
            .await
            .map_err(|e| AiLlmError::from_transport(e, self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(
                provider = %self.provider,
                %status,
                url = self.url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "provider returned non-success status"
            );
            return Err(self.fail(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: self.url.to_string(),
                snippet,
            })));
        }

        let out = resp.json::<R>().await.map_err(|e| {
            if e.is_timeout() {
                return AiLlmError::Timeout(self.timeout);
            }
            error!(provider = %self.provider, error = %e, url = self.url, "undecodable response");
            self.fail(ProviderErrorKind::Decode(format!(
                "serde error: {e}; expected {expected}"
            )))
        })?;

        debug!(latency_ms = started.elapsed().as_millis(), "POST {} done", self.url);
        Ok(out)
    }

    pub(crate) fn fail(&self, kind: ProviderErrorKind) -> AiLlmError {
        ProviderError::new(self.provider, kind).into()
    }
}

/// Validates an http(s) endpoint and strips trailing slashes.
pub(crate) fn base_url(provider: LlmProvider, endpoint: &str) -> Result<String, AiLlmError> {
    let trimmed = endpoint.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(ProviderError::new(
            provider,
            ProviderErrorKind::InvalidEndpoint(endpoint.to_string()),
        )
        .into())
    }
}
