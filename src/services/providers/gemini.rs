//! Google Gemini `generateContent` adapter (free-tier fallback).

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

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

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    max_output_tokens: u32,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, base_url: &str, max_output_tokens: u32) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_output_tokens,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    pub(crate) fn build_request(&self, prompt: &PromptPair) -> serde_json::Value {
        json!({
            "systemInstruction": {
                "parts": [{ "text": prompt.system }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt.user }]
            }],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": self.max_output_tokens,
                "responseMimeType": "application/json"
            }
        })
    }

    pub(crate) fn parse_response(&self, status: u16, body: &str) -> GenerationResponse {
        if !(200..300).contains(&status) {
            return http_error_envelope(ProviderName::Gemini, status, body);
        }

        // Gemini may split the payload across several parts.
        let text = serde_json::from_str::<GenerateContentResponse>(body)
            .ok()
            .and_then(|r| r.candidates.into_iter().next())
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            });
        parse_model_payload(ProviderName::Gemini, text.as_deref())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> ProviderName {
        ProviderName::Gemini
    }

    async fn invoke(
        &self,
        prompt: &PromptPair,
        config: &AIProviderConfig,
    ) -> AppResult<GenerationResponse> {
        let response = self
            .client
            .post(self.endpoint(&config.model))
            .header(CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", config.api_key.expose_secret())
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| transport_error(ProviderName::Gemini, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(ProviderName::Gemini, e))?;

        log::debug!("gemini responded with HTTP {} ({} bytes)", status, body.len());
        Ok(self.parse_response(status, &body))
    }
}
