pub mod envelope;
pub mod generation_request;
pub mod provider;
pub mod quality;
pub mod quiz_result;
pub use envelope::{ErrorKind, ErrorPayload, FailureReason, GenerationResponse};
pub use generation_request::{
    Document, DocumentContent, GenerationRequest, Page, QuestionType, StudyLevel, TypeProportions,
};
pub use provider::{AIProviderConfig, ProviderConfigs, ProviderName};
pub use quality::{DifficultyDistribution, QualityMetrics, TypeDistribution};
pub use quiz_result::{
    AnswerOption, AnswerValue, Citation, ContentSummary, Difficulty, Notes, Question, Quiz,
    QuizMetadata, QuizResult, SectionIdeas, SourceRef,
};
