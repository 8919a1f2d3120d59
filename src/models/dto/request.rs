use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Document, GenerationRequest, QuestionType, StudyLevel, TypeProportions},
};

fn default_language() -> String {
    "es".to_string()
}

fn default_question_types() -> Vec<QuestionType> {
    vec![
        QuestionType::MultipleChoice,
        QuestionType::ShortAnswer,
        QuestionType::TrueFalse,
    ]
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequestDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default = "default_language")]
    #[validate(length(min = 2, max = 10))]
    pub language: String,

    pub level: StudyLevel,

    #[validate(range(min = 1, max = 50))]
    pub question_count: u32,

    #[serde(default = "default_question_types")]
    #[validate(length(min = 1, message = "At least one question type is required"))]
    pub question_types: Vec<QuestionType>,

    #[serde(default)]
    pub type_proportions: Option<TypeProportions>,

    #[serde(default)]
    pub priority_topics: Vec<String>,

    #[validate(length(min = 1, message = "At least one document is required"))]
    pub documents: Vec<Document>,
}

impl TryFrom<GenerateQuizRequestDto> for GenerationRequest {
    type Error = AppError;

    fn try_from(dto: GenerateQuizRequestDto) -> AppResult<Self> {
        dto.validate()?;

        let type_proportions = dto
            .type_proportions
            .unwrap_or_else(|| TypeProportions::for_types(&dto.question_types));

        let request = GenerationRequest {
            language: dto.language,
            level: dto.level,
            question_count: dto.question_count,
            question_types: dto.question_types,
            type_proportions,
            priority_topics: dto
                .priority_topics
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            title: dto.title.trim().to_string(),
            documents: dto.documents,
        };
        request.validate()?;
        Ok(request)
    }
}
