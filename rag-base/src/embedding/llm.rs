use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;

use crate::{
    embedding::{EmbedFuture, EmbeddingsProvider},
    errors::rag_base_error::RagBaseError,
};

/// Embeds through the `embedding` profile of the shared LLM service.
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    model_id: String,
}

impl LlmEmbedder {
    /// Fails with [`RagBaseError::InvalidConfig`] when the service was built
    /// without an embedding profile.
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Result<Self, RagBaseError> {
        let model_id = svc
            .embedding_profile()
            .map(|cfg| cfg.model.clone())
            .ok_or_else(|| {
                RagBaseError::InvalidConfig("LLM service has no embedding profile".into())
            })?;
        Ok(Self { svc, model_id })
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a> {
        Box::pin(async move {
            self.svc
                .embed(text)
                .await
                .map_err(|e| RagBaseError::Embedding(e.to_string()))
        })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ai_llm_service::{LlmModelConfig, LlmProvider};
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    fn openai(model: &str, endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: model.into(),
            endpoint: endpoint.into(),
            api_key: Some("sk-test".into()),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn forwards_text_to_embedding_profile() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["model"], "text-embedding-ada-002");
                assert_eq!(body["input"], "Зарплата");
                Json(json!({ "data": [{ "embedding": [0.5, -0.5] }] }))
            }),
        );
        let base = serve(app).await;
        let svc = LlmServiceProfiles::new(
            openai("gpt-4.1-mini", &base),
            openai("text-embedding-ada-002", &base),
        )
        .unwrap();

        let embedder = LlmEmbedder::new(Arc::new(svc)).unwrap();
        assert_eq!(embedder.model_id(), "text-embedding-ada-002");
        assert_eq!(embedder.embed("Зарплата").await.unwrap(), vec![0.5, -0.5]);
    }

    #[tokio::test]
    async fn provider_failure_becomes_embedding_error() {
        let app = Router::new().route(
            "/v1/embeddings",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = serve(app).await;
        let svc = LlmServiceProfiles::new(openai("m", &base), openai("e", &base)).unwrap();

        let err = LlmEmbedder::new(Arc::new(svc))
            .unwrap()
            .embed("x")
            .await
            .unwrap_err();
        assert!(matches!(err, RagBaseError::Embedding(_)));
    }

    #[test]
    fn completion_only_service_is_rejected() {
        let svc =
            LlmServiceProfiles::completion_only(openai("gpt-4.1-mini", "https://api.openai.com"))
                .unwrap();
        assert!(matches!(
            LlmEmbedder::new(Arc::new(svc)),
            Err(RagBaseError::InvalidConfig(_))
        ));
    }
}
