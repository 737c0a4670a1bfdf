//! OpenAI service for text generation and embeddings.
//!
//! Minimal, non-streaming client around the OpenAI REST API.
//! Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/chat/completions — chat completion (non-streaming)
//! - POST {endpoint}/v1/embeddings       — embeddings retrieval
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::OpenAI`
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Every request is bounded by `cfg.timeout()`; an expired request surfaces
//! as [`AiLlmError::Timeout`].

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ProviderError, ProviderErrorKind},
    services::transport::{Endpoint, base_url},
};

/// Thin client for the OpenAI API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    timeout: Duration,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `InvalidProvider` if `cfg.provider` is not OpenAI
    /// - [`AiLlmError::Provider`] with `MissingApiKey` if `cfg.api_key` is `None`
    /// - [`AiLlmError::Provider`] with `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        // 1) Provider must be OpenAI.
        if cfg.provider != LlmProvider::OpenAI {
            return Err(
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        // 2) API key must be present.
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::MissingApiKey)
            })?;

        // 3) Endpoint must use http/https.
        let base = base_url(LlmProvider::OpenAI, &cfg.endpoint)?;

        // 4) HTTP client: timeout + default headers.
        let timeout = cfg.timeout();

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|e| {
                ProviderError::new(
                    LlmProvider::OpenAI,
                    ProviderErrorKind::Decode(format!("invalid API key header: {e}")),
                )
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let url_chat = format!("{base}/v1/chat/completions");
        let url_embeddings = format!("{base}/v1/embeddings");

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            timeout,
            url_chat,
            url_embeddings,
        })
    }

    /// Model config this client was built from.
    pub fn config(&self) -> &LlmModelConfig {
        &self.cfg
    }

    fn endpoint<'a>(&'a self, url: &'a str) -> Endpoint<'a> {
        Endpoint {
            client: &self.client,
            provider: LlmProvider::OpenAI,
            url,
            timeout: self.timeout,
        }
    }

    /// Performs a **non-streaming** chat completion request (`/v1/chat/completions`).
    ///
    /// Minimal `messages` array:
    /// - optional system message (if provided)
    /// - user message with `prompt`.
    ///
    /// # Errors
    /// - [`AiLlmError::Provider`] with `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::Timeout`] when the request exceeds the configured timeout
    /// - [`AiLlmError::HttpTransport`] for other client/network failures
    /// - [`AiLlmError::Provider`] with `Decode` / `EmptyChoices` for unusable payloads
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = ChatCompletionRequest::from_cfg(&self.cfg, prompt, system);
        debug!(prompt_len = prompt.len(), has_system = system.is_some(), "chat completion");

        let out: ChatCompletionResponse = self
            .endpoint(&self.url_chat)
            .post_json(&body, "`choices[0].message.content`")
            .await?;

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| self.endpoint(&self.url_chat).fail(ProviderErrorKind::EmptyChoices))?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = content.len(),
            "chat completion completed"
        );
        Ok(content)
    }

    /// Retrieves a single embeddings vector via `/v1/embeddings`.
    ///
    /// # Errors
    /// Same classes as [`OpenAiService::generate`]; an empty `data` array is a `Decode` error.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };
        let out: EmbeddingsResponse = self
            .endpoint(&self.url_embeddings)
            .post_json(&body, "`data[0].embedding`")
            .await?;

        let first = out.data.into_iter().next().ok_or_else(|| {
            self.endpoint(&self.url_embeddings).fail(ProviderErrorKind::Decode(
                "empty `data` in embeddings response".into(),
            ))
        })?;

        debug!(dim = first.embedding.len(), "embeddings completed");
        Ok(first.embedding)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model: &cfg.model,
            messages,
            temperature: cfg.temperature,
            top_p: cfg.top_p,
            max_tokens: cfg.max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    fn cfg(endpoint: String) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-4.1-mini".into(),
            endpoint,
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(1),
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn rejects_missing_api_key() {
        let mut c = cfg("http://localhost:1".into());
        c.api_key = None;
        let err = OpenAiService::new(c).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::MissingApiKey,
                ..
            })
        ));
    }

    #[test]
    fn rejects_foreign_provider_and_bad_endpoint() {
        let mut c = cfg("http://localhost:1".into());
        c.provider = LlmProvider::Ollama;
        assert!(OpenAiService::new(c).is_err());

        let err = OpenAiService::new(cfg("localhost:1".into())).unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::InvalidEndpoint(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn generate_sends_bearer_and_returns_first_choice() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(
                |headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                    assert_eq!(headers["authorization"], "Bearer sk-test");
                    assert_eq!(body["model"], "gpt-4.1-mini");
                    assert_eq!(body["messages"][0]["role"], "user");
                    Json(json!({
                        "choices": [{ "message": { "content": "Привет" } }]
                    }))
                },
            ),
        );
        let base = serve(app).await;
        let svc = OpenAiService::new(cfg(base)).unwrap();

        let out = svc.generate("hello", None).await.unwrap();
        assert_eq!(out, "Привет");
    }

    #[tokio::test]
    async fn non_success_status_is_reported_with_snippet() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
        );
        let base = serve(app).await;
        let svc = OpenAiService::new(cfg(base)).unwrap();

        let err = svc.embeddings("text").await.unwrap_err();
        match err {
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::HttpStatus(h),
                ..
            }) => {
                assert_eq!(h.status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(h.snippet, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn embeddings_return_first_data_vector() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "gpt-4.1-mini");
                assert_eq!(body["input"], "Навыки");
                Json(json!({
                    "object": "list",
                    "data": [
                        { "object": "embedding", "index": 0, "embedding": [0.25, -1.0, 0.0] },
                        { "object": "embedding", "index": 1, "embedding": [9.0] }
                    ]
                }))
            }),
        );
        let base = serve(app).await;
        let svc = OpenAiService::new(cfg(base)).unwrap();

        assert_eq!(svc.embeddings("Навыки").await.unwrap(), vec![0.25, -1.0, 0.0]);
    }

    #[tokio::test]
    async fn empty_or_malformed_embeddings_are_decode_errors() {
        let app = Router::new()
            .route(
                "/v1/embeddings",
                post(|| async { Json(json!({ "data": [] })) }),
            )
            .route(
                "/v1/chat/completions",
                post(|| async { Json(json!({ "unexpected": true })) }),
            );
        let base = serve(app).await;
        let svc = OpenAiService::new(cfg(base)).unwrap();

        for err in [
            svc.embeddings("text").await.unwrap_err(),
            svc.generate("text", None).await.unwrap_err(),
        ] {
            assert!(
                matches!(
                    err,
                    AiLlmError::Provider(ProviderError {
                        kind: ProviderErrorKind::Decode(_),
                        ..
                    })
                ),
                "unexpected error: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn slow_upstream_maps_to_timeout() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Json(json!({ "choices": [] }))
            }),
        );
        let base = serve(app).await;
        let svc = OpenAiService::new(cfg(base)).unwrap();

        let err = svc.generate("hello", Some("sys")).await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let base = serve(app).await;
        let svc = OpenAiService::new(cfg(base)).unwrap();

        let err = svc.generate("hello", None).await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::EmptyChoices,
                ..
            })
        ));
    }
}
