use actix_web::{get, http::StatusCode, post, web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::{
        domain::GenerationRequest,
        dto::{request::GenerateQuizRequestDto, response::GenerateQuizResponseDto},
    },
};

#[post("/api/quizzes/generate")]
async fn generate_quiz(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<GenerateQuizRequestDto>,
) -> Result<HttpResponse, AppError> {
    let request = GenerationRequest::try_from(request.into_inner())?;
    log::info!(
        "Generating {} question(s) for '{}' from {} document(s)",
        request.question_count,
        request.title,
        request.documents.len()
    );

    let outcome = state
        .quiz_generation_service
        .generate_validated_quiz(&request, &state.provider_configs)
        .await;

    let status = outcome
        .error
        .as_ref()
        .map(|e| e.kind.status_code())
        .unwrap_or(StatusCode::OK);

    Ok(HttpResponse::build(status).json(GenerateQuizResponseDto::new(outcome, get_request_id(&req))))
}

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
async fn health_check_ready(state: web::Data<AppState>) -> HttpResponse {
    let configs = &state.provider_configs;
    let primary_ready = configs.primary.has_credential();
    let fallbacks: Vec<&str> = configs
        .fallback_candidates()
        .iter()
        .map(|c| c.name.as_str())
        .collect();

    let response = serde_json::json!({
        "status": if primary_ready { "ready" } else { "not_ready" },
        "version": env!("CARGO_PKG_VERSION"),
        "providers": {
            "primary": configs.primary.name.as_str(),
            "fallbacks": fallbacks
        }
    });

    if primary_ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
