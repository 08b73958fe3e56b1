// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP SERVER - API JSON do pipeline de QA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//!
//! Servidor HTTP que expõe o pipeline de QA.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /v1/answer` - Executa o pipeline completo para uma pergunta
//!
//! ## Uso
//!
//! ```bash
//! cargo run --features server -- --server --port=3000
//! cargo run --features server -- --server --port=3000 --secret=minha-chave
//! ```

mod auth;
#[allow(missing_docs)]
pub mod handlers;
#[allow(missing_docs)]
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

pub use types::*;

use crate::config::{LlmConfig, PipelineConfig, RetrievalConfig};

/// Estado compartilhado entre todos os handlers
pub struct AppState {
    /// Configuração do LLM
    pub llm_config: LlmConfig,
    /// Configuração do retrieval
    pub retrieval_config: RetrievalConfig,
    /// Configuração do pipeline
    pub pipeline_config: PipelineConfig,
    /// Chave da API OpenAI
    pub openai_key: String,
    /// Chave do serviço de retrieval (opcional)
    pub retrieval_key: Option<String>,
    /// Token de autenticação opcional (Bearer)
    pub secret: Option<String>,
}

/// Inicia o servidor HTTP no endereço especificado.
///
/// Entry point chamado de main.rs quando `--server` é passado.
pub async fn start_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    use axum::{
        middleware,
        routing::{get, post},
        Router,
    };
    use tower_http::cors::CorsLayer;

    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/v1/answer", post(handlers::answer));

    // Auth middleware condicional
    let routes = if state.secret.is_some() {
        routes.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
    } else {
        routes
    };

    let app = routes.layer(CorsLayer::permissive()).with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Agentic RAG server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
