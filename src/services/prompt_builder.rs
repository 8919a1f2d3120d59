use std::fmt::Write as _;

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::{
    constants::prompts::{
        CLOSING_INSTRUCTION, DOCUMENTS_HEADER, EXAMPLE_HEADER, PARAMETERS_HEADER,
        QUIZ_SYSTEM_PROMPT, SCHEMA_HEADER,
    },
    errors::AppResult,
    models::domain::{
        AnswerOption, AnswerValue, Citation, ContentSummary, Difficulty, Document,
        DocumentContent, GenerationRequest, Notes, QuestionType, Question, Quiz, QuizMetadata,
        QuizResult, SectionIdeas, SourceRef,
    },
    services::response_validator::MIN_CHOICE_OPTIONS,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    /// SHA-256 of both directives, for logging prompt identity without content.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.system.as_bytes());
        hasher.update([0u8]);
        hasher.update(self.user.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn char_count(&self) -> usize {
        self.system.chars().count() + self.user.chars().count()
    }
}

pub fn build_prompt(request: &GenerationRequest) -> AppResult<PromptPair> {
    let schema = serde_json::to_string_pretty(&quiz_result_schema()?)?;
    let example = serde_json::to_string_pretty(&example_result())?;

    let mut user = String::new();
    let _ = writeln!(user, "{}", PARAMETERS_HEADER);
    user.push_str(&render_parameters(request));
    let _ = writeln!(user, "\n{}", DOCUMENTS_HEADER);
    for document in &request.documents {
        user.push_str(&render_document(document));
    }
    let _ = writeln!(user, "\n{}\n{}", SCHEMA_HEADER, schema);
    let _ = writeln!(user, "\n{}\n{}", EXAMPLE_HEADER, example);
    let _ = write!(user, "\n{}", CLOSING_INSTRUCTION);

    Ok(PromptPair {
        system: QUIZ_SYSTEM_PROMPT.to_string(),
        user,
    })
}

/// JSON Schema of `QuizResult`, tightened so it demands everything the
/// response validator rejects when missing. Serde defaults make the derived
/// schema looser than that.
pub fn quiz_result_schema() -> AppResult<Value> {
    let mut schema = serde_json::to_value(schemars::schema_for!(QuizResult))?;
    require(&mut schema, &["metadata", "resumen", "quiz"]);

    if let Some(quiz) = definition_mut(&mut schema, "Quiz") {
        require(quiz, &["n_solicitadas", "n_generadas", "preguntas"]);
    }

    if let Some(question) = definition_mut(&mut schema, "Question") {
        require(question, &["citas"]);
        if let Some(citations) = question.pointer_mut("/properties/citas") {
            if let Some(obj) = citations.as_object_mut() {
                obj.remove("default");
                obj.insert("minItems".to_string(), json!(1));
            }
        }
        if let Some(obj) = question.as_object_mut() {
            obj.insert(
                "allOf".to_string(),
                json!([{
                    "if": {
                        "properties": { "tipo": { "const": QuestionType::MultipleChoice.as_str() } },
                        "required": ["tipo"]
                    },
                    "then": {
                        "required": ["opciones"],
                        "properties": {
                            "opciones": { "type": "array", "minItems": MIN_CHOICE_OPTIONS }
                        }
                    }
                }]),
            );
        }
    }

    Ok(schema)
}

fn definition_mut<'a>(schema: &'a mut Value, name: &str) -> Option<&'a mut Value> {
    let key = if schema.get("$defs").is_some() {
        "$defs"
    } else {
        "definitions"
    };
    schema.get_mut(key).and_then(|defs| defs.get_mut(name))
}

fn require(schema: &mut Value, fields: &[&str]) {
    let Some(obj) = schema.as_object_mut() else {
        return;
    };
    let required = obj.entry("required").or_insert_with(|| json!([]));
    if let Some(list) = required.as_array_mut() {
        for field in fields {
            if !list.iter().any(|v| v == field) {
                list.push(json!(field));
            }
        }
    }
}

fn render_parameters(request: &GenerationRequest) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "- title: {}", request.title);
    let _ = writeln!(out, "- language: {}", request.language);
    let _ = writeln!(out, "- level: {}", request.level.as_str());
    let _ = writeln!(out, "- requested_questions (n_solicitadas): {}", request.question_count);

    let allowed: Vec<&str> = request.question_types.iter().map(QuestionType::as_str).collect();
    let _ = writeln!(out, "- allowed_types: {}", allowed.join(", "));

    let targets: Vec<String> = request
        .type_proportions
        .target_counts(request.question_count)
        .iter()
        .filter(|(kind, _)| request.question_types.contains(kind))
        .map(|(kind, n)| format!("{}={}", kind.as_str(), n))
        .collect();
    let _ = writeln!(
        out,
        "- type_proportions: opcion_multiple={:.2}, respuesta_corta={:.2}, verdadero_falso={:.2} (targets: {})",
        request.type_proportions.multiple_choice,
        request.type_proportions.short_answer,
        request.type_proportions.true_false,
        targets.join(", ")
    );

    if request.priority_topics.is_empty() {
        let _ = writeln!(out, "- priority_topics: none");
    } else {
        let _ = writeln!(out, "- priority_topics (in order):");
        for (i, topic) in request.priority_topics.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, topic);
        }
    }
    out
}

fn render_document(document: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\n=== DOCUMENT doc_id: {} | name: {} | type: {} ===",
        document.doc_id,
        document.name,
        document.content.type_tag()
    );
    match &document.content {
        DocumentContent::Pdf { pages } => {
            for page in pages {
                let _ = writeln!(
                    out,
                    "[chunk_id: {} | page: {}]\n{}",
                    page.chunk_id, page.page_number, page.text
                );
            }
        }
        DocumentContent::Notes { text } => {
            let _ = writeln!(out, "[chunk_id: {}]\n{}", document.notes_chunk_id(), text);
        }
    }
    let _ = writeln!(out, "=== END DOCUMENT {} ===", document.doc_id);
    out
}

/// Output example embedded in the prompt. Built from the same types the
/// validator reads, so field names and nesting cannot drift.
pub fn example_result() -> QuizResult {
    let citation = Citation {
        doc_id: Some("doc-1".to_string()),
        chunk_id: "doc-1-p3".to_string(),
        page: Some(3),
        quote: Some("short verbatim quote from the chunk".to_string()),
    };

    QuizResult {
        metadata: Some(QuizMetadata {
            title: "<quiz title>".to_string(),
            language: "<language code>".to_string(),
            level: "<secundaria|universidad|profesional>".to_string(),
            generated_at: "<ISO-8601 timestamp>".to_string(),
            sources: vec![SourceRef {
                doc_id: "doc-1".to_string(),
                name: "<document name>".to_string(),
            }],
        }),
        summary: Some(ContentSummary {
            overview: "<overview of the material>".to_string(),
            key_points: vec!["<key point>".to_string()],
            sections: vec![SectionIdeas {
                section: "<section name>".to_string(),
                ideas: vec!["<idea>".to_string()],
                citations: vec![citation.clone()],
            }],
        }),
        quiz: Some(Quiz {
            requested_count: 3,
            generated_count: 3,
            questions: vec![
                Question {
                    id: "q1".to_string(),
                    question_type: QuestionType::MultipleChoice,
                    difficulty: Difficulty::Low,
                    topic_tags: vec!["<topic>".to_string()],
                    statement: "<question statement, at least 10 characters>".to_string(),
                    options: Some(vec![
                        AnswerOption {
                            id: "a".to_string(),
                            text: "<option text>".to_string(),
                        },
                        AnswerOption {
                            id: "b".to_string(),
                            text: "<option text>".to_string(),
                        },
                    ]),
                    correct_answer: AnswerValue::Text("a".to_string()),
                    explanation: "<why the answer is correct, at least 10 characters>".to_string(),
                    citations: vec![citation.clone()],
                },
                Question {
                    id: "q2".to_string(),
                    question_type: QuestionType::ShortAnswer,
                    difficulty: Difficulty::Medium,
                    topic_tags: vec!["<topic>".to_string()],
                    statement: "<question statement, at least 10 characters>".to_string(),
                    options: None,
                    correct_answer: AnswerValue::Text("<short answer>".to_string()),
                    explanation: "<why the answer is correct, at least 10 characters>".to_string(),
                    citations: vec![citation.clone()],
                },
                Question {
                    id: "q3".to_string(),
                    question_type: QuestionType::TrueFalse,
                    difficulty: Difficulty::High,
                    topic_tags: vec!["<topic>".to_string()],
                    statement: "<statement to judge, at least 10 characters>".to_string(),
                    options: None,
                    correct_answer: AnswerValue::Bool(true),
                    explanation: "<why the answer is correct, at least 10 characters>".to_string(),
                    citations: vec![citation],
                },
            ],
        }),
        study_tips: vec!["<study tip>".to_string()],
        notes: Notes {
            insufficient_evidence: false,
            detail: None,
        },
    }
}
