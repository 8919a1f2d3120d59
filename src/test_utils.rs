use crate::models::domain::{
    AIProviderConfig, AnswerOption, AnswerValue, Citation, ContentSummary, Difficulty, Document,
    DocumentContent, GenerationRequest, Notes, Page, ProviderConfigs, ProviderName, Question,
    QuestionType, Quiz, QuizMetadata, QuizResult, SectionIdeas, SourceRef, StudyLevel,
    TypeProportions,
};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// A two-page PDF about cell biology
    pub fn pdf_document() -> Document {
        Document {
            doc_id: "doc-bio-1".to_string(),
            name: "Tema 1 - La celula.pdf".to_string(),
            content: DocumentContent::Pdf {
                pages: vec![
                    Page {
                        page_number: 1,
                        chunk_id: "doc-bio-1-p1".to_string(),
                        text: "La celula es la unidad basica de la vida.".to_string(),
                    },
                    Page {
                        page_number: 2,
                        chunk_id: "doc-bio-1-p2".to_string(),
                        text: "La mitocondria produce ATP mediante la respiracion celular."
                            .to_string(),
                    },
                ],
            },
        }
    }

    pub fn notes_document() -> Document {
        Document {
            doc_id: "notes-bio".to_string(),
            name: "Apuntes de clase".to_string(),
            content: DocumentContent::Notes {
                text: "El nucleo contiene el material genetico de la celula.".to_string(),
            },
        }
    }

    /// A valid request over one PDF and one set of notes
    pub fn sample_request() -> GenerationRequest {
        GenerationRequest {
            language: "es".to_string(),
            level: StudyLevel::University,
            question_count: 10,
            question_types: vec![
                QuestionType::MultipleChoice,
                QuestionType::ShortAnswer,
                QuestionType::TrueFalse,
            ],
            type_proportions: TypeProportions::default(),
            priority_topics: vec!["mitocondria".to_string(), "nucleo".to_string()],
            title: "Biologia celular".to_string(),
            documents: vec![pdf_document(), notes_document()],
        }
    }

    /// A question that passes validation as-is, with one citation.
    pub fn question(id: &str, question_type: QuestionType, difficulty: Difficulty) -> Question {
        let (options, correct_answer) = match question_type {
            QuestionType::MultipleChoice => (
                Some(vec![
                    AnswerOption {
                        id: "a".to_string(),
                        text: "Producir ATP".to_string(),
                    },
                    AnswerOption {
                        id: "b".to_string(),
                        text: "Almacenar ADN".to_string(),
                    },
                ]),
                AnswerValue::Text("a".to_string()),
            ),
            QuestionType::TrueFalse => (None, AnswerValue::Bool(true)),
            QuestionType::ShortAnswer => (None, AnswerValue::Text("La mitocondria".to_string())),
        };

        Question {
            id: id.to_string(),
            question_type,
            difficulty,
            topic_tags: vec!["mitocondria".to_string()],
            statement: "Cual es la funcion principal de la mitocondria en la celula?".to_string(),
            options,
            correct_answer,
            explanation: "El documento indica que la mitocondria produce ATP.".to_string(),
            citations: vec![Citation {
                doc_id: Some("doc-bio-1".to_string()),
                chunk_id: "doc-bio-1-p2".to_string(),
                page: Some(2),
                quote: Some("La mitocondria produce ATP".to_string()),
            }],
        }
    }

    /// A complete result with `n` requested and `n` generated multiple-choice questions.
    pub fn sample_result(n: u32) -> QuizResult {
        QuizResult {
            metadata: Some(QuizMetadata {
                title: "Biologia celular".to_string(),
                language: "es".to_string(),
                level: "universidad".to_string(),
                generated_at: "2026-01-15".to_string(),
                sources: vec![SourceRef {
                    doc_id: "doc-bio-1".to_string(),
                    name: "Tema 1 - La celula.pdf".to_string(),
                }],
            }),
            summary: Some(ContentSummary {
                overview: "Estructura y funciones de la celula.".to_string(),
                key_points: vec!["La mitocondria produce ATP".to_string()],
                sections: vec![SectionIdeas {
                    section: "Organulos".to_string(),
                    ideas: vec!["Funcion de la mitocondria".to_string()],
                    citations: vec![],
                }],
            }),
            quiz: Some(Quiz {
                requested_count: n,
                generated_count: n,
                questions: (1..=n)
                    .map(|i| {
                        question(
                            &format!("q{}", i),
                            QuestionType::MultipleChoice,
                            Difficulty::Medium,
                        )
                    })
                    .collect(),
            }),
            study_tips: vec!["Repasa los organulos".to_string()],
            notes: Notes::default(),
        }
    }

    /// OpenAI primary with Gemini and Groq fallbacks, all keyed.
    pub fn provider_configs() -> ProviderConfigs {
        ProviderConfigs::new(AIProviderConfig::new(
            ProviderName::OpenAi,
            "gpt-4o-mini",
            "sk-test",
        ))
        .with_secondary(AIProviderConfig::new(
            ProviderName::Gemini,
            "gemini-1.5-flash",
            "gemini-test",
        ))
        .with_tertiary(AIProviderConfig::new(
            ProviderName::Groq,
            "llama-3.1-70b-versatile",
            "gsk-test",
        ))
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use actix_web::http::StatusCode;

    use crate::services::observability::{GenerationEvent, GenerationObserver};

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }

    /// Keeps every event it sees, in order.
    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<GenerationEvent>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<GenerationEvent> {
            self.events.lock().map(|e| e.clone()).unwrap_or_default()
        }
    }

    impl GenerationObserver for RecordingObserver {
        fn on_event(&self, event: &GenerationEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use validator::Validate;

    #[test]
    fn test_fixtures_sample_request_is_valid() {
        let request = sample_request();
        assert!(request.validate().is_ok());
        assert_eq!(request.documents.len(), 2);
    }

    #[test]
    fn test_fixtures_sample_result_counts() {
        let result = sample_result(4);
        let quiz = result.quiz.expect("quiz");
        assert_eq!(quiz.questions.len(), 4);
        assert_eq!(quiz.generated_count, 4);
        assert_eq!(quiz.requested_count, 4);
    }

    #[test]
    fn test_fixtures_provider_configs_have_two_fallbacks() {
        assert_eq!(provider_configs().fallback_candidates().len(), 2);
    }
}
