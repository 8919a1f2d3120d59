use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{
        AIProviderConfig, ErrorPayload, FailureReason, GenerationResponse, ProviderName,
        QuizResult,
    },
    services::prompt_builder::PromptPair,
};

pub mod gemini;
pub mod openai;

pub use gemini::GeminiAdapter;
pub use openai::OpenAiCompatibleAdapter;

pub const TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 8192;

/// One LLM backend. Upstream failures come back as error envelopes; only
/// transport failures are returned as `Err`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn name(&self) -> ProviderName;

    async fn invoke(
        &self,
        prompt: &PromptPair,
        config: &AIProviderConfig,
    ) -> AppResult<GenerationResponse>;
}

/// Adapters keyed by provider name, resolved once at startup.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderName, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_http_timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new()
            .with_adapter(Arc::new(OpenAiCompatibleAdapter::new(
                ProviderName::OpenAi,
                client.clone(),
                &config.openai_base_url,
                config.max_output_tokens,
            )))
            .with_adapter(Arc::new(GeminiAdapter::new(
                client.clone(),
                &config.gemini_base_url,
                config.max_output_tokens,
            )))
            .with_adapter(Arc::new(OpenAiCompatibleAdapter::new(
                ProviderName::Groq,
                client,
                &config.groq_base_url,
                config.max_output_tokens,
            ))))
    }

    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.name(), adapter);
        self
    }

    pub fn get(&self, name: ProviderName) -> AppResult<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&name).cloned().ok_or_else(|| {
            AppError::ConfigurationError(format!("No adapter registered for provider '{}'", name))
        })
    }
}

/// Turns the model's text payload into an envelope. Never fails.
pub(crate) fn parse_model_payload(provider: ProviderName, text: Option<&str>) -> GenerationResponse {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return GenerationResponse::failure(ErrorPayload::provider(
            provider,
            format!("{} returned an empty response", provider),
            FailureReason::EmptyPayload,
        ));
    };

    match serde_json::from_str::<QuizResult>(strip_code_fences(text)) {
        Ok(result) => GenerationResponse::success(result),
        Err(e) => GenerationResponse::failure(ErrorPayload::provider(
            provider,
            format!("Failed to parse {} response as JSON: {}", provider, e),
            FailureReason::JsonParseFailure,
        )),
    }
}

/// Envelope for a non-success HTTP status, preferring the provider's own
/// `error.message` over the raw body.
pub(crate) fn http_error_envelope(provider: ProviderName, status: u16, body: &str) -> GenerationResponse {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| truncate(body.trim(), 300));

    GenerationResponse::failure(ErrorPayload::provider(
        provider,
        format!("{} API error (HTTP {}): {}", provider, status, detail),
        FailureReason::HttpStatus,
    ))
}

pub(crate) fn transport_error(provider: ProviderName, err: reqwest::Error) -> AppError {
    AppError::AIProviderError {
        provider,
        message: format!("Request to {} failed: {}", provider, err),
    }
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push('…');
        out
    }
}
