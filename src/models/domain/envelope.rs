use serde::{Deserialize, Serialize};

use crate::models::domain::{provider::ProviderName, quiz_result::QuizResult};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum ErrorKind {
    #[serde(rename = "VALIDATION_ERROR")]
    Validation,
    #[serde(rename = "AI_PROVIDER_ERROR")]
    AIProvider,
    #[serde(rename = "CONFIGURATION_ERROR")]
    Configuration,
    #[serde(rename = "TIMEOUT_ERROR")]
    Timeout,
    #[serde(rename = "INTERNAL_ERROR")]
    Internal,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::AIProvider => "AI_PROVIDER_ERROR",
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::Timeout => "TIMEOUT_ERROR",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    HttpStatus,
    JsonParseFailure,
    EmptyPayload,
    MissingResult,
    IncompleteStructure,
    InvalidQuestion,
    Timeout,
    RetriesExhausted,
    InvalidRequest,
    Configuration,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ErrorPayload {
    pub message: String,
    #[serde(rename = "where")]
    pub location: String,
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl ErrorPayload {
    pub fn validation(message: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            message: message.into(),
            location: "validation".to_string(),
            kind: ErrorKind::Validation,
            provider: None,
            reason: Some(reason),
        }
    }

    pub fn provider(provider: ProviderName, message: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            message: message.into(),
            location: format!("provider:{}", provider),
            kind: ErrorKind::AIProvider,
            provider: Some(provider),
            reason: Some(reason),
        }
    }
}

/// Outcome of a single generation attempt: a result or an error, never both.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GenerationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<QuizResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl GenerationResponse {
    pub fn success(result: QuizResult) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: ErrorPayload) -> Self {
        Self {
            result: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.result.is_some()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }

    pub fn is_well_formed(&self) -> bool {
        self.result.is_some() != self.error.is_some()
    }
}
