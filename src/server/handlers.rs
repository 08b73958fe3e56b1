// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ENDPOINT HANDLERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use uuid::Uuid;

use super::types::*;
use super::AppState;
use crate::agent::RagPipeline;
use crate::llm::OpenAiClient;
use crate::retrieval::HttpRetrievalClient;

// ── GET /health ─────────────────────────────────

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ── POST /v1/answer ─────────────────────────────

/// Endpoint principal: executa o pipeline completo para uma pergunta.
///
/// Qualquer falha de estágio aborta o run — nunca um 200 com resposta
/// parcial ou truncada.
pub async fn answer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnswerRequest>,
) -> Response {
    let question = body.question.trim().to_string();
    if question.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "The \"question\" parameter is required and must not be empty.",
        );
    }

    let request_id = format!("req_{}", Uuid::new_v4().simple());
    log::info!("[{}] Incoming question: {}", request_id, question);

    // Clientes por requisição — nenhum estado compartilhado entre runs
    let llm: Arc<dyn crate::llm::LlmClient> = Arc::new(OpenAiClient::from_config(
        state.openai_key.clone(),
        &state.llm_config,
    ));
    let tool: Arc<dyn crate::retrieval::RetrievalClient> = Arc::new(
        HttpRetrievalClient::from_config(&state.retrieval_config, state.retrieval_key.clone()),
    );
    let pipeline = RagPipeline::new(llm, tool, state.pipeline_config.clone());

    match tokio::spawn(async move { pipeline.run(&question).await }).await {
        Ok(Ok(answer_state)) => {
            Json(AnswerResponse::from_state(request_id, answer_state)).into_response()
        }
        Ok(Err(e)) => {
            log::error!("[{}] Pipeline failed: {}", request_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Pipeline failed: {}", e),
            )
        }
        Err(e) => {
            log::error!("[{}] Pipeline task panicked: {}", request_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Internal error: {}", e),
            )
        }
    }
}

// ── Helpers ─────────────────────────────────────

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiError {
            error: ApiErrorDetail {
                message: message.into(),
                error_type: "invalid_request_error".into(),
                param: None,
                code: None,
            },
        }),
    )
        .into_response()
}
