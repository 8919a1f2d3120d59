//! Structural validation and best-effort repair of model output.
//!
//! `validate` is a pure transform: it never mutates its input and returns
//! either a (possibly repaired) copy of the result or a rejection envelope.

use crate::models::domain::{
    AnswerValue, ErrorPayload, FailureReason, GenerationResponse, QuestionType, Question,
    QuizResult,
};

/// Fewest options a multiple-choice question may carry.
pub const MIN_CHOICE_OPTIONS: usize = 2;

const TRUE_WORDS: [&str; 4] = ["true", "yes", "verdadero", "sí"];
const FALSE_WORDS: [&str; 3] = ["false", "no", "falso"];

pub fn validate(envelope: &GenerationResponse) -> GenerationResponse {
    if envelope.error.is_some() {
        return envelope.clone();
    }

    let Some(result) = envelope.result.as_ref() else {
        return reject("missing result", FailureReason::MissingResult);
    };

    match repair(result) {
        Ok(repaired) => GenerationResponse::success(repaired),
        Err(error) => GenerationResponse::failure(error),
    }
}

fn repair(result: &QuizResult) -> Result<QuizResult, ErrorPayload> {
    if result.metadata.is_none() || result.summary.is_none() || result.quiz.is_none() {
        return Err(ErrorPayload::validation(
            "incomplete structure",
            FailureReason::IncompleteStructure,
        ));
    }

    let mut repaired = result.clone();
    if let Some(quiz) = repaired.quiz.as_mut() {
        let actual = quiz.questions.len() as u32;
        if quiz.generated_count != actual {
            log::debug!(
                "Repairing n_generadas from {} to {}",
                quiz.generated_count,
                actual
            );
            quiz.generated_count = actual;
        }

        for question in quiz.questions.iter_mut() {
            check_question(question)?;
        }
    }

    Ok(repaired)
}

fn check_question(question: &mut Question) -> Result<(), ErrorPayload> {
    match question.question_type {
        QuestionType::MultipleChoice => match &question.options {
            None => {
                return Err(invalid(question, "multiple-choice question is missing opciones"));
            }
            Some(options) if options.len() < MIN_CHOICE_OPTIONS => {
                return Err(invalid(
                    question,
                    &format!(
                        "multiple-choice question needs at least {} opciones, got {}",
                        MIN_CHOICE_OPTIONS,
                        options.len()
                    ),
                ));
            }
            Some(_) => {}
        },
        QuestionType::TrueFalse => {
            if let AnswerValue::Text(raw) = &question.correct_answer {
                let coerced = coerce_bool(raw).ok_or_else(|| {
                    invalid(
                        question,
                        &format!("true/false answer '{}' is not a boolean", raw),
                    )
                })?;
                question.correct_answer = AnswerValue::Bool(coerced);
            }
        }
        _ => {}
    }

    if question.citations.is_empty() {
        return Err(invalid(question, "question has no citations"));
    }

    Ok(())
}

/// Lexical boolean coercion for true/false answers, case-insensitive.
pub fn coerce_bool(raw: &str) -> Option<bool> {
    let normalized = raw.trim().to_lowercase();
    if TRUE_WORDS.contains(&normalized.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn invalid(question: &Question, detail: &str) -> ErrorPayload {
    ErrorPayload::validation(
        format!("question {}: {}", question.id, detail),
        FailureReason::InvalidQuestion,
    )
}

fn reject(message: &str, reason: FailureReason) -> GenerationResponse {
    GenerationResponse::failure(ErrorPayload::validation(message, reason))
}
