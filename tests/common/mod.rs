#![allow(dead_code)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use quizgen_server::{
    errors::{AppError, AppResult},
    models::domain::{
        AIProviderConfig, ErrorPayload, FailureReason, GenerationRequest, GenerationResponse,
        ProviderConfigs, ProviderName, QuizResult,
    },
    services::{
        observability::NoopObserver,
        prompt_builder::PromptPair,
        providers::{ProviderAdapter, ProviderRegistry},
        QuizGenerationService,
    },
};

pub enum Step {
    Respond(GenerationResponse),
    Fail(AppError),
    Hang,
}

/// Adapter that replays a fixed script of outcomes, one per call.
pub struct ScriptedAdapter {
    name: ProviderName,
    script: Mutex<VecDeque<Step>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedAdapter {
    pub fn new(name: ProviderName, steps: Vec<Step>) -> Self {
        Self {
            name,
            script: Mutex::new(steps.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn name(&self) -> ProviderName {
        self.name
    }

    async fn invoke(
        &self,
        _prompt: &PromptPair,
        _config: &AIProviderConfig,
    ) -> AppResult<GenerationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().await.pop_front();
        match step {
            Some(Step::Respond(envelope)) => Ok(envelope),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(AppError::InternalError("hung call resumed".to_string()))
            }
            None => Err(AppError::InternalError(format!("{} script exhausted", self.name))),
        }
    }
}

pub struct Harness {
    pub service: QuizGenerationService,
    pub openai_calls: Arc<AtomicUsize>,
    pub gemini_calls: Arc<AtomicUsize>,
    pub groq_calls: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new(openai: Vec<Step>, gemini: Vec<Step>, groq: Vec<Step>) -> Self {
        let openai = ScriptedAdapter::new(ProviderName::OpenAi, openai);
        let gemini = ScriptedAdapter::new(ProviderName::Gemini, gemini);
        let groq = ScriptedAdapter::new(ProviderName::Groq, groq);
        let (openai_calls, gemini_calls, groq_calls) = (openai.calls(), gemini.calls(), groq.calls());

        let registry = ProviderRegistry::new()
            .with_adapter(Arc::new(openai))
            .with_adapter(Arc::new(gemini))
            .with_adapter(Arc::new(groq));

        Self {
            service: QuizGenerationService::new(registry, Arc::new(NoopObserver)),
            openai_calls,
            gemini_calls,
            groq_calls,
        }
    }

    pub fn count(calls: &Arc<AtomicUsize>) -> usize {
        calls.load(Ordering::SeqCst)
    }
}

pub fn all_providers() -> ProviderConfigs {
    ProviderConfigs::new(AIProviderConfig::new(ProviderName::OpenAi, "gpt-4o-mini", "sk-int"))
        .with_secondary(AIProviderConfig::new(
            ProviderName::Gemini,
            "gemini-1.5-flash",
            "gm-int",
        ))
        .with_tertiary(AIProviderConfig::new(
            ProviderName::Groq,
            "llama-3.1-70b-versatile",
            "gsk-int",
        ))
}

pub fn request() -> GenerationRequest {
    serde_json::from_value(serde_json::json!({
        "language": "es",
        "level": "secundaria",
        "question_count": 3,
        "question_types": ["opcion_multiple", "verdadero_falso"],
        "type_proportions": { "multiple_choice": 0.7, "short_answer": 0.0, "true_false": 0.3 },
        "priority_topics": ["fotosintesis"],
        "title": "Fotosintesis",
        "documents": [
            {
                "doc_id": "bio-2",
                "name": "Tema 2.pdf",
                "type": "pdf",
                "pages": [
                    { "page_number": 1, "chunk_id": "bio-2-p1", "text": "La fotosintesis ocurre en los cloroplastos." },
                    { "page_number": 2, "chunk_id": "bio-2-p2", "text": "La clorofila absorbe luz roja y azul." }
                ]
            },
            { "doc_id": "apuntes", "name": "Apuntes", "type": "notes", "text": "El oxigeno es un subproducto." }
        ]
    }))
    .expect("request fixture parses")
}

/// Model output as it arrives on the wire, with `generated` questions
/// for `requested` asked and a deliberately stale `n_generadas`.
pub fn model_output(requested: u32, generated: u32) -> QuizResult {
    let questions: Vec<serde_json::Value> = (1..=generated)
        .map(|i| {
            if i % 2 == 0 {
                serde_json::json!({
                    "id": format!("q{}", i),
                    "tipo": "verdadero_falso",
                    "dificultad": "baja",
                    "tema_tags": ["fotosintesis"],
                    "enunciado": "La fotosintesis ocurre en los cloroplastos.",
                    "respuesta_correcta": "Verdadero",
                    "explicacion": "Lo indica la pagina 1.",
                    "citas": [{ "doc_id": "bio-2", "chunk_id": "bio-2-p1", "pagina": 1 }]
                })
            } else {
                serde_json::json!({
                    "id": format!("q{}", i),
                    "tipo": "opcion_multiple",
                    "dificultad": "media",
                    "tema_tags": ["clorofila"],
                    "enunciado": "Que luz absorbe la clorofila?",
                    "opciones": [
                        { "id": "a", "texto": "Roja y azul" },
                        { "id": "b", "texto": "Verde" }
                    ],
                    "respuesta_correcta": "a",
                    "explicacion": "La pagina 2 lo menciona.",
                    "citas": [{ "chunk_id": "bio-2-p2", "cita_textual": "absorbe luz roja y azul" }]
                })
            }
        })
        .collect();

    serde_json::from_value(serde_json::json!({
        "metadata": {
            "titulo": "Fotosintesis",
            "idioma": "es",
            "nivel": "secundaria",
            "fecha_generacion": "2026-03-01",
            "fuentes": [{ "doc_id": "bio-2", "nombre": "Tema 2.pdf" }]
        },
        "resumen": {
            "vision_general": "Proceso de la fotosintesis.",
            "puntos_clave": ["Cloroplastos"],
            "ideas_por_seccion": []
        },
        "quiz": {
            "n_solicitadas": requested,
            "n_generadas": 99,
            "preguntas": questions
        },
        "consejos_estudio": ["Dibuja un cloroplasto"],
        "notas": { "evidencia_insuficiente": generated < requested }
    }))
    .expect("model output fixture parses")
}

pub fn provider_error(provider: ProviderName, message: &str) -> GenerationResponse {
    GenerationResponse::failure(ErrorPayload::provider(provider, message, FailureReason::HttpStatus))
}

pub fn transport(provider: ProviderName) -> AppError {
    AppError::AIProviderError {
        provider,
        message: "connection reset by peer".to_string(),
    }
}
