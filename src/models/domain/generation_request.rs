use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

const PROPORTION_TOLERANCE: f64 = 0.01;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
pub enum StudyLevel {
    #[serde(rename = "secundaria", alias = "secondary")]
    Secondary,
    #[serde(rename = "universidad", alias = "university")]
    University,
    #[serde(rename = "profesional", alias = "professional")]
    Professional,
}

impl StudyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyLevel::Secondary => "secundaria",
            StudyLevel::University => "universidad",
            StudyLevel::Professional => "profesional",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy, JsonSchema)]
pub enum QuestionType {
    #[serde(rename = "opcion_multiple", alias = "multiple-choice")]
    MultipleChoice,
    #[serde(rename = "respuesta_corta", alias = "short-answer")]
    ShortAnswer,
    #[serde(rename = "verdadero_falso", alias = "true-false")]
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "opcion_multiple",
            QuestionType::ShortAnswer => "respuesta_corta",
            QuestionType::TrueFalse => "verdadero_falso",
        }
    }
}

/// Fractions of the quiz assigned to each question type.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Copy)]
pub struct TypeProportions {
    pub multiple_choice: f64,
    pub short_answer: f64,
    pub true_false: f64,
}

impl Default for TypeProportions {
    fn default() -> Self {
        Self {
            multiple_choice: 0.6,
            short_answer: 0.2,
            true_false: 0.2,
        }
    }
}

impl TypeProportions {
    /// Default shares restricted to `allowed` and rescaled to sum to 1.
    pub fn for_types(allowed: &[QuestionType]) -> Self {
        let defaults = Self::default();
        let keep = |kind: QuestionType, share: f64| {
            if allowed.contains(&kind) {
                share
            } else {
                0.0
            }
        };
        let restricted = Self {
            multiple_choice: keep(QuestionType::MultipleChoice, defaults.multiple_choice),
            short_answer: keep(QuestionType::ShortAnswer, defaults.short_answer),
            true_false: keep(QuestionType::TrueFalse, defaults.true_false),
        };

        let total = restricted.sum();
        if restricted == defaults || total <= 0.0 {
            return defaults;
        }
        Self {
            multiple_choice: restricted.multiple_choice / total,
            short_answer: restricted.short_answer / total,
            true_false: restricted.true_false / total,
        }
    }

    pub fn share_of(&self, kind: QuestionType) -> f64 {
        match kind {
            QuestionType::MultipleChoice => self.multiple_choice,
            QuestionType::ShortAnswer => self.short_answer,
            QuestionType::TrueFalse => self.true_false,
        }
    }

    pub fn sum(&self) -> f64 {
        self.multiple_choice + self.short_answer + self.true_false
    }

    /// Splits `total` questions across the three types. Rounding leftovers go
    /// to the type with the largest share so the counts always add up.
    pub fn target_counts(&self, total: u32) -> [(QuestionType, u32); 3] {
        let shares = [
            (QuestionType::MultipleChoice, self.multiple_choice),
            (QuestionType::ShortAnswer, self.short_answer),
            (QuestionType::TrueFalse, self.true_false),
        ];
        let mut counts = shares.map(|(kind, share)| {
            (kind, (share.max(0.0) * f64::from(total)).round() as u32)
        });

        let assigned: u32 = counts.iter().map(|(_, n)| n).sum();
        let largest = shares
            .iter()
            .enumerate()
            .fold(0, |best, (i, (_, share))| {
                if *share > shares[best].1 {
                    i
                } else {
                    best
                }
            });

        if assigned > total {
            let mut excess = assigned - total;
            for idx in std::iter::once(largest).chain(0..counts.len()) {
                let take = excess.min(counts[idx].1);
                counts[idx].1 -= take;
                excess -= take;
                if excess == 0 {
                    break;
                }
            }
        } else {
            counts[largest].1 += total - assigned;
        }

        counts
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Page {
    pub page_number: u32,
    pub chunk_id: String,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentContent {
    Pdf { pages: Vec<Page> },
    Notes { text: String },
}

impl DocumentContent {
    pub fn type_tag(&self) -> &'static str {
        match self {
            DocumentContent::Pdf { .. } => "pdf",
            DocumentContent::Notes { .. } => "notes",
        }
    }
}

/// Already-extracted source document. Immutable once handed to the pipeline.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
pub struct Document {
    #[validate(length(min = 1, max = 200))]
    pub doc_id: String,
    pub name: String,
    #[serde(flatten)]
    #[validate(custom(function = "validate_document_content"))]
    pub content: DocumentContent,
}

impl Document {
    pub fn notes_chunk_id(&self) -> String {
        format!("{}#notes", self.doc_id)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[validate(schema(function = "validate_excluded_types_have_no_share"))]
pub struct GenerationRequest {
    #[validate(length(min = 2, max = 10))]
    pub language: String,

    pub level: StudyLevel,

    #[validate(range(min = 1, max = 50))]
    pub question_count: u32,

    #[validate(length(min = 1, message = "At least one question type is required"))]
    pub question_types: Vec<QuestionType>,

    #[validate(custom(function = "validate_proportions"))]
    pub type_proportions: TypeProportions,

    #[serde(default)]
    pub priority_topics: Vec<String>,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1, message = "At least one document is required"), nested)]
    pub documents: Vec<Document>,
}

fn validate_proportions(proportions: &TypeProportions) -> Result<(), ValidationError> {
    let parts = [
        proportions.multiple_choice,
        proportions.short_answer,
        proportions.true_false,
    ];
    if parts.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
        return Err(ValidationError::new("proportion_out_of_range"));
    }
    if (proportions.sum() - 1.0).abs() > PROPORTION_TOLERANCE {
        return Err(ValidationError::new("proportions_must_sum_to_one"));
    }
    Ok(())
}

fn validate_excluded_types_have_no_share(request: &GenerationRequest) -> Result<(), ValidationError> {
    let kinds = [
        QuestionType::MultipleChoice,
        QuestionType::ShortAnswer,
        QuestionType::TrueFalse,
    ];
    let excluded_with_share = kinds.into_iter().any(|kind| {
        !request.question_types.contains(&kind) && request.type_proportions.share_of(kind) > 0.0
    });
    if excluded_with_share {
        return Err(ValidationError::new("excluded_type_has_proportion"));
    }
    Ok(())
}

fn validate_document_content(content: &DocumentContent) -> Result<(), ValidationError> {
    match content {
        DocumentContent::Pdf { pages } if pages.is_empty() => {
            Err(ValidationError::new("pdf_without_pages"))
        }
        DocumentContent::Pdf { pages } if pages.iter().any(|p| p.chunk_id.trim().is_empty()) => {
            Err(ValidationError::new("page_without_chunk_id"))
        }
        DocumentContent::Notes { text } if text.trim().is_empty() => {
            Err(ValidationError::new("empty_notes"))
        }
        _ => Ok(()),
    }
}
