use actix_web::web;

use crate::errors::AppError;

pub mod quiz_handler;

pub use quiz_handler::{generate_quiz, health_check, health_check_ready};

/// Body extractor config that reports malformed JSON as a validation error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(8 * 1024 * 1024)
        .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into())
}
