use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::quiz_generation_service::GenerationOutcome;

#[derive(Debug, Clone, Serialize)]
pub struct GenerateQuizResponseDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(flatten)]
    pub outcome: GenerationOutcome,
    pub completed_at: DateTime<Utc>,
}

impl GenerateQuizResponseDto {
    pub fn new(outcome: GenerationOutcome, request_id: Option<String>) -> Self {
        Self {
            request_id,
            outcome,
            completed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{ErrorPayload, FailureReason};

    #[test]
    fn test_failed_outcome_serializes_error_only() {
        let outcome = GenerationOutcome {
            result: None,
            error: Some(ErrorPayload::validation(
                "incomplete structure",
                FailureReason::IncompleteStructure,
            )),
            quality_metrics: None,
            provider: None,
        };
        let json = serde_json::to_value(GenerateQuizResponseDto::new(outcome, Some("req-1".into())))
            .expect("dto serializes");

        assert_eq!(json["request_id"], "req-1");
        assert_eq!(json["error"]["where"], "validation");
        assert!(json.get("result").is_none());
        assert!(json.get("qualityMetrics").is_none());
        assert!(json["completed_at"].is_string());
    }
}
