use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    models::domain::ProviderConfigs,
    services::{
        observability::LogObserver, providers::ProviderRegistry,
        quiz_generation_service::QuizGenerationService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_generation_service: Arc<QuizGenerationService>,
    pub provider_configs: Arc<ProviderConfigs>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let registry = ProviderRegistry::from_config(&config)?;
        let service = QuizGenerationService::new(registry, Arc::new(LogObserver));

        Ok(Self::with_service(config, service))
    }

    pub fn with_service(config: Config, service: QuizGenerationService) -> Self {
        let provider_configs = config.provider_configs();
        log::info!(
            "Primary provider {} ({}), {} fallback(s) configured",
            provider_configs.primary.name,
            provider_configs.primary.model,
            provider_configs.fallback_candidates().len()
        );

        Self {
            quiz_generation_service: Arc::new(service),
            provider_configs: Arc::new(provider_configs),
            config: Arc::new(config),
        }
    }
}
