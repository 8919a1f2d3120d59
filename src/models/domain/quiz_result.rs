use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::generation_request::QuestionType;

/// Quiz payload produced by the model. The three top-level sections are
/// optional on the wire so incomplete output can be rejected with a
/// validation error instead of a parse failure.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct QuizResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<QuizMetadata>,
    #[serde(rename = "resumen", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ContentSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Quiz>,
    #[serde(rename = "consejos_estudio", default)]
    pub study_tips: Vec<String>,
    #[serde(rename = "notas", default)]
    pub notes: Notes,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct QuizMetadata {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "idioma")]
    pub language: String,
    #[serde(rename = "nivel")]
    pub level: String,
    #[serde(rename = "fecha_generacion", default)]
    pub generated_at: String,
    #[serde(rename = "fuentes", default)]
    pub sources: Vec<SourceRef>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SourceRef {
    pub doc_id: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct ContentSummary {
    #[serde(rename = "vision_general")]
    pub overview: String,
    #[serde(rename = "puntos_clave", default)]
    pub key_points: Vec<String>,
    #[serde(rename = "ideas_por_seccion", default)]
    pub sections: Vec<SectionIdeas>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SectionIdeas {
    #[serde(rename = "seccion")]
    pub section: String,
    #[serde(default)]
    pub ideas: Vec<String>,
    #[serde(rename = "citas", default)]
    pub citations: Vec<Citation>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Quiz {
    #[serde(rename = "n_solicitadas")]
    pub requested_count: u32,
    // Recomputed by the validator, so a missing count is repaired rather than rejected.
    #[serde(rename = "n_generadas", default)]
    pub generated_count: u32,
    #[serde(rename = "preguntas", default)]
    pub questions: Vec<Question>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy, JsonSchema)]
pub enum Difficulty {
    #[serde(rename = "baja", alias = "low")]
    Low,
    #[serde(rename = "media", alias = "medium")]
    Medium,
    #[serde(rename = "alta", alias = "high")]
    High,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Question {
    pub id: String,
    #[serde(rename = "tipo")]
    pub question_type: QuestionType,
    #[serde(rename = "dificultad")]
    pub difficulty: Difficulty,
    #[serde(rename = "tema_tags", default)]
    pub topic_tags: Vec<String>,
    #[serde(rename = "enunciado")]
    pub statement: String,
    #[serde(rename = "opciones", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AnswerOption>>, // multiple choice only
    #[serde(rename = "respuesta_correcta")]
    pub correct_answer: AnswerValue,
    #[serde(rename = "explicacion")]
    pub explanation: String,
    #[serde(rename = "citas", default)]
    pub citations: Vec<Citation>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct AnswerOption {
    pub id: String,
    #[serde(rename = "texto")]
    pub text: String,
}

/// Boolean for true/false questions, text (option id or short answer) otherwise.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Citation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    pub chunk_id: String,
    #[serde(rename = "pagina", default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(rename = "cita_textual", default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>, // at most 30 words
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct Notes {
    #[serde(rename = "evidencia_insuficiente", default)]
    pub insufficient_evidence: bool,
    #[serde(rename = "detalle", default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
