pub mod observability;
pub mod prompt_builder;
pub mod providers;
pub mod quality_scorer;
pub mod quiz_generation_service;
pub mod resilience;
pub mod response_validator;

pub use quiz_generation_service::{GenerationOutcome, QuizGenerationService};
