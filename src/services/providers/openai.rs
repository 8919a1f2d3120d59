//! Adapter for OpenAI-compatible `chat/completions` endpoints. Serves the
//! primary OpenAI provider and the Groq tertiary with a different base URL.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{
    errors::AppResult,
    models::domain::{AIProviderConfig, GenerationResponse, ProviderName},
    services::{
        prompt_builder::PromptPair,
        providers::{
            http_error_envelope, parse_model_payload, transport_error, ProviderAdapter,
            TEMPERATURE,
        },
    },
};

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ResponseFormat {
    r#type: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiCompatibleAdapter {
    provider: ProviderName,
    client: reqwest::Client,
    base_url: String,
    max_output_tokens: u32,
}

impl OpenAiCompatibleAdapter {
    pub fn new(
        provider: ProviderName,
        client: reqwest::Client,
        base_url: &str,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            provider,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_output_tokens,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub(crate) fn build_request(&self, prompt: &PromptPair, model: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: prompt.user.clone(),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: self.max_output_tokens,
            response_format: ResponseFormat {
                r#type: "json_object".into(),
            },
        }
    }

    /// Maps a raw HTTP status and body into an envelope.
    pub(crate) fn parse_response(&self, status: u16, body: &str) -> GenerationResponse {
        if !(200..300).contains(&status) {
            return http_error_envelope(self.provider, status, body);
        }

        let content = serde_json::from_str::<ChatCompletionResponse>(body)
            .ok()
            .and_then(|r| r.choices.into_iter().next())
            .and_then(|c| c.message.content);
        parse_model_payload(self.provider, content.as_deref())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiCompatibleAdapter {
    fn name(&self) -> ProviderName {
        self.provider
    }

    async fn invoke(
        &self,
        prompt: &PromptPair,
        config: &AIProviderConfig,
    ) -> AppResult<GenerationResponse> {
        let request = self.build_request(prompt, &config.model);

        let response = self
            .client
            .post(self.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .header(
                AUTHORIZATION,
                format!("Bearer {}", config.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(self.provider, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(self.provider, e))?;

        log::debug!(
            "{} responded with HTTP {} ({} bytes)",
            self.provider,
            status,
            body.len()
        );
        Ok(self.parse_response(status, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::FailureReason;

    fn adapter() -> OpenAiCompatibleAdapter {
        OpenAiCompatibleAdapter::new(
            ProviderName::OpenAi,
            reqwest::Client::new(),
            "https://api.openai.com/v1/",
            4096,
        )
    }

    fn prompt() -> PromptPair {
        PromptPair {
            system: "system directive".to_string(),
            user: "user directive".to_string(),
        }
    }

    #[test]
    fn test_request_body_has_chat_shape_and_low_temperature() {
        let body = serde_json::to_value(adapter().build_request(&prompt(), "gpt-4o-mini"))
            .expect("request serializes");

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user directive");
        assert_eq!(body["max_tokens"], 4096);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!((body["temperature"].as_f64().expect("temperature") - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(adapter().endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_success_body_is_parsed_into_result() {
        let body = r#"{
            "choices": [{ "message": { "role": "assistant",
                "content": "{\"consejos_estudio\": [\"Repasa el tema 1\"], \"notas\": {\"evidencia_insuficiente\": true}}" } }]
        }"#;
        let envelope = adapter().parse_response(200, body);

        let result = envelope.result.expect("result");
        assert_eq!(result.study_tips, vec!["Repasa el tema 1".to_string()]);
        assert!(result.notes.insufficient_evidence);
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_rate_limit_status_becomes_error_envelope() {
        let body = r#"{"error":{"message":"Rate limit exceeded for requests","code":"rate_limit_exceeded"}}"#;
        let envelope = adapter().parse_response(429, body);

        assert!(envelope.is_well_formed());
        let error = envelope.error.expect("error");
        assert!(error.message.contains("Rate limit exceeded for requests"));
        assert_eq!(error.provider, Some(ProviderName::OpenAi));
    }

    #[test]
    fn test_non_json_content_becomes_parse_failure() {
        let body = r#"{"choices":[{"message":{"content":"I cannot help with that"}}]}"#;
        let envelope = adapter().parse_response(200, body);

        assert_eq!(
            envelope.error.and_then(|e| e.reason),
            Some(FailureReason::JsonParseFailure)
        );
    }

    #[test]
    fn test_missing_choices_becomes_empty_payload() {
        let envelope = adapter().parse_response(200, r#"{"choices":[]}"#);
        assert_eq!(
            envelope.error.and_then(|e| e.reason),
            Some(FailureReason::EmptyPayload)
        );
    }
}
