use ai_llm_service::AiLlmError;
use answer_pipeline::PipelineError;
use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rag_base::RagBaseError;
use serde::Serialize;
use signature_auth::{AuthError, RegistryError};
use thiserror::Error;

use crate::core::app_config::ConfigError;

/// Public application error type.
///
/// Startup variants abort `main`; request variants become JSON rejections
/// with a stable `error` code.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid AUTH_CLIENTS: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    KnowledgeBase(#[from] RagBaseError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    // --- IO / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    #[error("invalid request: {0}")]
    Validation(String),

    /// Same text for unknown clients and bad signatures.
    #[error("invalid client or signature")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("file upload failed")]
    UploadFailed,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // startup-only or internal
            AppError::Config(_)
            | AppError::Registry(_)
            | AppError::Llm(_)
            | AppError::KnowledgeBase(_)
            | AppError::Pipeline(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::UploadFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) | AppError::Registry(_) => "CONFIG_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::KnowledgeBase(_) | AppError::Pipeline(_) => "KNOWLEDGE_BASE_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::NotFound => "NOT_FOUND",
            AppError::UploadFailed => "UPLOAD_FAILED",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal details stay in the logs.
        let message = if status.is_server_error() && !matches!(self, AppError::UploadFailed) {
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            error: self.error_code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MalformedSignature => {
                AppError::Validation("signature must be 64 hex characters".into())
            }
            AuthError::UnknownClient | AuthError::SignatureMismatch | AuthError::InvalidSecret => {
                AppError::Unauthorized
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::Validation(err.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(err: MultipartRejection) -> Self {
        AppError::Validation(err.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Validation(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_do_not_reveal_cause() {
        let a = AppError::from(AuthError::UnknownClient);
        let b = AppError::from(AuthError::SignatureMismatch);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(b.error_code(), "UNAUTHORIZED");
    }

    #[test]
    fn malformed_signature_is_validation() {
        let e = AppError::from(AuthError::MalformedSignature);
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn startup_errors_map_to_500() {
        let e = AppError::from(ConfigError::Missing("API_ADDRESS"));
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.error_code(), "CONFIG_ERROR");
    }
}
