use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::domain::{
    envelope::{ErrorKind, ErrorPayload, FailureReason},
    provider::ProviderName,
};

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("AI provider error ({provider}): {message}")]
    AIProviderError {
        provider: ProviderName,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Timeout: {0}")]
    TimeoutError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_) => ErrorKind::Validation,
            AppError::AIProviderError { .. } => ErrorKind::AIProvider,
            AppError::ConfigurationError(_) => ErrorKind::Configuration,
            AppError::TimeoutError(_) => ErrorKind::Timeout,
            AppError::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Converts the error into the structured payload shown to callers.
    pub fn to_payload(&self, location: impl Into<String>) -> ErrorPayload {
        let reason = match self {
            AppError::ValidationError(_) => Some(FailureReason::InvalidRequest),
            AppError::ConfigurationError(_) => Some(FailureReason::Configuration),
            AppError::TimeoutError(_) => Some(FailureReason::Timeout),
            AppError::AIProviderError { .. } => Some(FailureReason::RetriesExhausted),
            AppError::InternalError(_) => None,
        };
        let provider = match self {
            AppError::AIProviderError { provider, .. } => Some(*provider),
            _ => None,
        };

        ErrorPayload {
            message: self.to_string(),
            location: location.into(),
            kind: self.kind(),
            provider,
            reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::AIProvider => StatusCode::BAD_GATEWAY,
            ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalError(format!("JSON serialization error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::TimeoutError("test".into()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::AIProviderError {
                provider: ProviderName::OpenAi,
                message: "boom".into()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ConfigurationError("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::AIProviderError {
            provider: ProviderName::Gemini,
            message: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "AI provider error (gemini): quota exceeded");
        assert_eq!(err.error_code(), "AI_PROVIDER_ERROR");
    }

    #[test]
    fn test_payload_carries_kind_location_and_provider() {
        let payload = AppError::AIProviderError {
            provider: ProviderName::Groq,
            message: "connection reset".into(),
        }
        .to_payload("provider:groq");

        assert_eq!(payload.kind, ErrorKind::AIProvider);
        assert_eq!(payload.location, "provider:groq");
        assert_eq!(payload.provider, Some(ProviderName::Groq));

        let timeout = AppError::TimeoutError("too slow".into()).to_payload("orchestrator");
        assert_eq!(timeout.reason, Some(FailureReason::Timeout));
        assert_eq!(timeout.provider, None);
    }
}
