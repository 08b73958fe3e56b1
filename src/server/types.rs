// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SCHEMAS DA API DE QA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use crate::agent::AnswerState;

// ─────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────

/// Request para POST /v1/answer
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
}

// ─────────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────────

/// Resposta completa do pipeline.
///
/// `plan` e `sub_questions` só aparecem quando o planejamento produziu
/// conteúdo; ausência não é erro para o cliente.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    /// ID único da requisição
    pub id: String,
    /// Timestamp unix (segundos)
    pub created: i64,
    /// Resposta final verificada
    pub answer: String,
    /// Contexto consolidado usado como grounding
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_questions: Option<Vec<String>>,
}

impl AnswerResponse {
    /// Monta a resposta a partir do estado terminal do pipeline
    pub fn from_state(id: String, state: AnswerState) -> Self {
        Self {
            id,
            created: chrono::Utc::now().timestamp(),
            answer: state.answer.unwrap_or_default(),
            context: state.context.unwrap_or_default(),
            plan: state.plan,
            sub_questions: state.sub_questions,
        }
    }
}

// ─────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────

/// Envelope de erro da API
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// Detalhe de um erro da API
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
