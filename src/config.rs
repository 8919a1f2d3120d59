use std::env;

use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{AIProviderConfig, ProviderConfigs, ProviderName},
    services::providers::DEFAULT_MAX_OUTPUT_TOKENS,
};

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub openai_api_key: SecretString,
    pub openai_model: String,
    pub openai_base_url: String,
    pub gemini_api_key: SecretString,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub groq_api_key: SecretString,
    pub groq_model: String,
    pub groq_base_url: String,
    pub max_output_tokens: u32,
    pub llm_http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            gemini_api_key: SecretString::from(env::var("GEMINI_API_KEY").unwrap_or_default()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            groq_api_key: SecretString::from(env::var("GROQ_API_KEY").unwrap_or_default()),
            groq_model: env::var("GROQ_MODEL")
                .unwrap_or_else(|_| "llama-3.1-70b-versatile".to_string()),
            groq_base_url: env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            max_output_tokens: env::var("LLM_MAX_OUTPUT_TOKENS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
            llm_http_timeout_secs: env::var("LLM_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(90),
        }
    }

    /// OpenAI is always the primary. Gemini and Groq are only offered as
    /// fallbacks when their keys are set.
    pub fn provider_configs(&self) -> ProviderConfigs {
        let mut configs = ProviderConfigs::new(AIProviderConfig::new(
            ProviderName::OpenAi,
            self.openai_model.clone(),
            self.openai_api_key.expose_secret(),
        ));

        let gemini = AIProviderConfig::new(
            ProviderName::Gemini,
            self.gemini_model.clone(),
            self.gemini_api_key.expose_secret(),
        );
        if gemini.has_credential() {
            configs = configs.with_secondary(gemini);
        }

        let groq = AIProviderConfig::new(
            ProviderName::Groq,
            self.groq_model.clone(),
            self.groq_api_key.expose_secret(),
        );
        if groq.has_credential() {
            configs = configs.with_tertiary(groq);
        }

        configs
    }

    /// Fails fast at startup when the primary provider cannot be called.
    pub fn validate_for_production(&self) -> AppResult<()> {
        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ConfigurationError(
                "OPENAI_API_KEY is not set. The primary provider needs a key.".to_string(),
            ));
        }

        if self.max_output_tokens == 0 {
            return Err(AppError::ConfigurationError(
                "LLM_MAX_OUTPUT_TOKENS must be greater than zero".to_string(),
            ));
        }

        if self.gemini_api_key.expose_secret().trim().is_empty()
            && self.groq_api_key.expose_secret().trim().is_empty()
        {
            log::warn!("No fallback provider keys set; rate-limited requests will not fall back");
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            openai_api_key: SecretString::from("sk-test".to_string()),
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "http://127.0.0.1:9/v1".to_string(),
            gemini_api_key: SecretString::from("gemini-test".to_string()),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "http://127.0.0.1:9/v1beta".to_string(),
            groq_api_key: SecretString::from(String::new()),
            groq_model: "llama-3.1-70b-versatile".to_string(),
            groq_base_url: "http://127.0.0.1:9/openai/v1".to_string(),
            max_output_tokens: 2048,
            llm_http_timeout_secs: 5,
        }
    }
}
