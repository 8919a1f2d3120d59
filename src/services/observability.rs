//! Observability capability handed to the generation service. The pipeline
//! reports typed events; the implementation decides where they go.

use std::time::Duration;

use crate::models::domain::ProviderName;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    PromptBuilt {
        fingerprint: String,
        chars: usize,
    },
    ProviderCallStarted {
        provider: ProviderName,
        model: String,
    },
    ProviderCallFinished {
        provider: ProviderName,
        elapsed: Duration,
        succeeded: bool,
    },
    FallbackTriggered {
        from: ProviderName,
        reason: String,
    },
    FallbackFailed {
        provider: ProviderName,
        reason: String,
    },
    ValidationRejected {
        reason: String,
    },
    Completed {
        provider: ProviderName,
        elapsed: Duration,
        questions: usize,
    },
    Failed {
        elapsed: Duration,
        reason: String,
    },
}

pub trait GenerationObserver: Send + Sync {
    fn on_event(&self, event: &GenerationEvent);
}

/// Forwards events to the `log` facade.
pub struct LogObserver;

impl GenerationObserver for LogObserver {
    fn on_event(&self, event: &GenerationEvent) {
        match event {
            GenerationEvent::PromptBuilt { fingerprint, chars } => {
                log::debug!("Built prompt {} ({} chars)", fingerprint, chars)
            }
            GenerationEvent::ProviderCallStarted { provider, model } => {
                log::info!("Calling provider {} with model {}", provider, model)
            }
            GenerationEvent::ProviderCallFinished {
                provider,
                elapsed,
                succeeded,
            } => log::info!(
                "Provider {} finished in {}ms (success: {})",
                provider,
                elapsed.as_millis(),
                succeeded
            ),
            GenerationEvent::FallbackTriggered { from, reason } => {
                log::warn!("Primary provider {} hit a usage limit, falling back: {}", from, reason)
            }
            GenerationEvent::FallbackFailed { provider, reason } => {
                log::warn!("Fallback provider {} failed: {}", provider, reason)
            }
            GenerationEvent::ValidationRejected { reason } => {
                log::warn!("Model output rejected: {}", reason)
            }
            GenerationEvent::Completed {
                provider,
                elapsed,
                questions,
            } => log::info!(
                "Generated {} question(s) via {} in {}ms",
                questions,
                provider,
                elapsed.as_millis()
            ),
            GenerationEvent::Failed { elapsed, reason } => {
                log::error!("Quiz generation failed after {}ms: {}", elapsed.as_millis(), reason)
            }
        }
    }
}

pub struct NoopObserver;

impl GenerationObserver for NoopObserver {
    fn on_event(&self, _event: &GenerationEvent) {}
}
