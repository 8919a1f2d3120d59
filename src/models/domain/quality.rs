use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DifficultyDistribution {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeDistribution {
    pub multiple_choice: u32,
    pub short_answer: u32,
    pub true_false: u32,
}

/// Descriptive metrics over an accepted quiz. Computed per response.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QualityMetrics {
    pub completeness: f64,
    pub difficulty_distribution: DifficultyDistribution,
    pub type_distribution: TypeDistribution,
    pub avg_citations_per_question: f64,
    pub avg_statement_length: usize,
    pub insufficient_evidence: bool,
}
