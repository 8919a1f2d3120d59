use crate::models::domain::{
    Difficulty, DifficultyDistribution, GenerationResponse, QualityMetrics, QuestionType,
    TypeDistribution,
};

/// Metrics over an accepted envelope. `None` for errors or missing results.
pub fn score(envelope: &GenerationResponse) -> Option<QualityMetrics> {
    if envelope.error.is_some() {
        return None;
    }
    let result = envelope.result.as_ref()?;
    let quiz = result.quiz.as_ref()?;
    let questions = &quiz.questions;

    let completeness = if quiz.requested_count == 0 {
        0.0
    } else {
        f64::from(quiz.generated_count) / f64::from(quiz.requested_count)
    };

    let mut difficulty_distribution = DifficultyDistribution::default();
    let mut type_distribution = TypeDistribution::default();
    for question in questions {
        match question.difficulty {
            Difficulty::Low => difficulty_distribution.low += 1,
            Difficulty::Medium => difficulty_distribution.medium += 1,
            Difficulty::High => difficulty_distribution.high += 1,
        }
        match question.question_type {
            QuestionType::MultipleChoice => type_distribution.multiple_choice += 1,
            QuestionType::ShortAnswer => type_distribution.short_answer += 1,
            QuestionType::TrueFalse => type_distribution.true_false += 1,
        }
    }

    let (avg_citations_per_question, avg_statement_length) = if questions.is_empty() {
        (0.0, 0)
    } else {
        let count = questions.len() as f64;
        let citations: usize = questions.iter().map(|q| q.citations.len()).sum();
        let chars: usize = questions.iter().map(|q| q.statement.chars().count()).sum();
        (citations as f64 / count, (chars as f64 / count).round() as usize)
    };

    Some(QualityMetrics {
        completeness,
        difficulty_distribution,
        type_distribution,
        avg_citations_per_question,
        avg_statement_length,
        insufficient_evidence: result.notes.insufficient_evidence,
    })
}
