//! Quiz generation pipeline: prompt, primary provider call under retry and
//! timeout, rate-limit fallback chain, validation, and quality scoring.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tokio::time::Instant;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        AIProviderConfig, ErrorPayload, GenerationRequest, GenerationResponse, ProviderConfigs,
        ProviderName, QualityMetrics, QuizResult,
    },
    services::{
        observability::{GenerationEvent, GenerationObserver},
        prompt_builder::{build_prompt, PromptPair},
        providers::ProviderRegistry,
        quality_scorer, response_validator,
        resilience::CallPolicy,
    },
};

static USAGE_LIMIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)rate[\s_-]?limit|quota|usage")
        .expect("USAGE_LIMIT_REGEX is a valid regex pattern")
});

/// Whether an error message signals a rate-limit, quota, or usage condition.
pub fn is_usage_limit_error(message: &str) -> bool {
    USAGE_LIMIT_REGEX.is_match(message)
}

fn failure_location(err: &AppError) -> String {
    match err {
        AppError::ValidationError(_) => "validation".to_string(),
        AppError::ConfigurationError(_) => "configuration".to_string(),
        AppError::AIProviderError { provider, .. } => format!("provider:{}", provider),
        AppError::TimeoutError(_) | AppError::InternalError(_) => "orchestrator".to_string(),
    }
}

/// Final answer for one generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QuizResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
    #[serde(rename = "qualityMetrics", skip_serializing_if = "Option::is_none")]
    pub quality_metrics: Option<QualityMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderName>,
}

impl GenerationOutcome {
    fn accepted(result: QuizResult, metrics: Option<QualityMetrics>, provider: ProviderName) -> Self {
        Self {
            result: Some(result),
            error: None,
            quality_metrics: metrics,
            provider: Some(provider),
        }
    }

    fn failed(error: ErrorPayload) -> Self {
        Self {
            result: None,
            error: Some(error),
            quality_metrics: None,
            provider: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }
}

pub struct QuizGenerationService {
    registry: ProviderRegistry,
    observer: Arc<dyn GenerationObserver>,
    primary_policy: CallPolicy,
    fallback_policy: CallPolicy,
}

impl QuizGenerationService {
    pub fn new(registry: ProviderRegistry, observer: Arc<dyn GenerationObserver>) -> Self {
        Self {
            registry,
            observer,
            primary_policy: CallPolicy::primary(),
            fallback_policy: CallPolicy::fallback(),
        }
    }

    pub fn with_policies(mut self, primary: CallPolicy, fallback: CallPolicy) -> Self {
        self.primary_policy = primary;
        self.fallback_policy = fallback;
        self
    }

    pub async fn generate_validated_quiz(
        &self,
        request: &GenerationRequest,
        providers: &ProviderConfigs,
    ) -> GenerationOutcome {
        let started = Instant::now();

        match self.run(request, providers).await {
            Ok((envelope, provider)) => self.finish(envelope, provider, started),
            Err(err) => {
                self.observer.on_event(&GenerationEvent::Failed {
                    elapsed: started.elapsed(),
                    reason: err.to_string(),
                });
                GenerationOutcome::failed(err.to_payload(failure_location(&err)))
            }
        }
    }

    /// Steps 1-3: returns the surviving envelope and the provider behind it.
    async fn run(
        &self,
        request: &GenerationRequest,
        providers: &ProviderConfigs,
    ) -> AppResult<(GenerationResponse, ProviderName)> {
        request.validate()?;

        let primary = &providers.primary;
        if !primary.has_credential() {
            return Err(AppError::ConfigurationError(format!(
                "Missing API key for primary provider '{}'",
                primary.name
            )));
        }

        let prompt = build_prompt(request)?;
        self.observer.on_event(&GenerationEvent::PromptBuilt {
            fingerprint: prompt.fingerprint(),
            chars: prompt.char_count(),
        });

        // Thrown failures here (timeout, exhausted retries) are fatal.
        let envelope = self.call(&prompt, primary, self.primary_policy).await?;

        let Some(message) = envelope.error_message() else {
            return Ok((envelope, primary.name));
        };
        if !primary.name.is_commercial() || !is_usage_limit_error(message) {
            return Ok((envelope, primary.name));
        }

        self.observer.on_event(&GenerationEvent::FallbackTriggered {
            from: primary.name,
            reason: message.to_string(),
        });

        match self.try_fallbacks(&prompt, providers).await {
            Some(adopted) => Ok(adopted),
            None => Ok((envelope, primary.name)),
        }
    }

    /// Tries each configured fallback in order; the first success wins.
    /// Failures are only reported to the observer.
    async fn try_fallbacks(
        &self,
        prompt: &PromptPair,
        providers: &ProviderConfigs,
    ) -> Option<(GenerationResponse, ProviderName)> {
        for candidate in providers.fallback_candidates() {
            let reason = match self.call(prompt, candidate, self.fallback_policy).await {
                Ok(envelope) if envelope.is_success() => return Some((envelope, candidate.name)),
                Ok(envelope) => envelope
                    .error_message()
                    .unwrap_or("malformed envelope")
                    .to_string(),
                Err(err) => err.to_string(),
            };
            self.observer.on_event(&GenerationEvent::FallbackFailed {
                provider: candidate.name,
                reason,
            });
        }
        None
    }

    async fn call(
        &self,
        prompt: &PromptPair,
        config: &AIProviderConfig,
        policy: CallPolicy,
    ) -> AppResult<GenerationResponse> {
        let adapter = self.registry.get(config.name)?;
        let adapter = adapter.as_ref();

        self.observer.on_event(&GenerationEvent::ProviderCallStarted {
            provider: config.name,
            model: config.model.clone(),
        });
        let started = Instant::now();

        let outcome = policy
            .run(
                move || adapter.invoke(prompt, config),
                &format!("{} provider call timed out", config.name),
            )
            .await;

        self.observer.on_event(&GenerationEvent::ProviderCallFinished {
            provider: config.name,
            elapsed: started.elapsed(),
            succeeded: matches!(&outcome, Ok(envelope) if envelope.is_success()),
        });
        outcome
    }

    /// Steps 4-6: validate, then score the accepted result.
    fn finish(
        &self,
        envelope: GenerationResponse,
        provider: ProviderName,
        started: Instant,
    ) -> GenerationOutcome {
        let validated = response_validator::validate(&envelope);
        let metrics = quality_scorer::score(&validated);

        match (validated.result, validated.error) {
            (Some(result), None) => {
                let questions = result
                    .quiz
                    .as_ref()
                    .map(|q| q.questions.len())
                    .unwrap_or_default();
                self.observer.on_event(&GenerationEvent::Completed {
                    provider,
                    elapsed: started.elapsed(),
                    questions,
                });
                GenerationOutcome::accepted(result, metrics, provider)
            }
            (_, Some(error)) => {
                if envelope.error.is_none() {
                    self.observer.on_event(&GenerationEvent::ValidationRejected {
                        reason: error.message.clone(),
                    });
                }
                self.observer.on_event(&GenerationEvent::Failed {
                    elapsed: started.elapsed(),
                    reason: error.message.clone(),
                });
                GenerationOutcome::failed(error)
            }
            (None, None) => GenerationOutcome::failed(
                AppError::InternalError("Validator produced an empty envelope".to_string())
                    .to_payload("validation"),
            ),
        }
    }
}
