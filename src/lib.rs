//! # Agentic RAG - Pipeline de QA Multi-Agente
//!
//! Este crate implementa um pipeline de question-answering com quatro
//! agentes encadeados sobre uma base de conhecimento vetorial:
//!
//! 1. **Planning**: decompõe a pergunta em uma estratégia de busca e
//!    sub-questions focadas
//! 2. **Retrieval**: sessão com ferramenta de busca vetorial que coleta
//!    contexto guiado pelo plano
//! 3. **Summarization**: gera um rascunho de resposta APENAS a partir do
//!    contexto recuperado
//! 4. **Verification**: confere o rascunho contra o contexto e remove
//!    claims sem suporte
//!
//! ## Arquitetura
//!
//! O fluxo é uma máquina de estados estritamente sequencial:
//!
//! ```text
//! question → Planning → (plan, sub_questions)
//!          → Retrieval → context
//!          → Summarization → draft_answer
//!          → Verification → answer
//! ```
//!
//! Um [`agent::AnswerState`] único atravessa o run; cada estágio contribui
//! campos novos e nenhum estágio lê campos produzidos depois dele. Falha de
//! invocação em qualquer estágio aborta o run inteiro — sem retry, sem
//! resposta parcial.
//!
//! ## Exemplo de Uso
//!
//! ```rust,ignore
//! use agentic_rag::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = RagPipeline::new(llm_client, retrieval_client, PipelineConfig::default());
//!     let state = pipeline.run("What is HNSW indexing?").await.unwrap();
//!     println!("{}", state.answer.unwrap_or_default());
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Tipos fundamentais compartilhados por todo o sistema.
///
/// Define o modelo de conversa:
/// - [`types::MessageRole`]: papéis fechados (Human, Assistant, Tool)
/// - [`types::Message`]: entrada em um histórico ordenado
/// - [`types::ToolCall`]: pedido de busca emitido pelo modelo
pub mod types;

/// Pipeline de QA com máquina de estados.
///
/// O coração do sistema. Contém:
/// - [`agent::RagPipeline`]: o orquestrador dos quatro estágios
/// - [`agent::AnswerState`]: registro atravessando o run
/// - [`agent::PipelineState`]: estados da sequência fixa
/// - [`agent::parse_planning_response`]: parser texto→estrutura do plano
/// - Os quatro estágios e a [`agent::ToolSession`] de retrieval
pub mod agent;

/// Clientes para Large Language Models (LLMs).
///
/// Define a trait [`llm::LlmClient`] e implementações:
/// - OpenAI Chat Completions (com tool calling)
/// - Mock com respostas roteirizadas para testes
pub mod llm;

/// Clientes para busca vetorial de passagens.
///
/// Define a trait [`retrieval::RetrievalClient`] e implementações:
/// - Serviço HTTP de busca vetorial
/// - Mock para testes
pub mod retrieval;

/// Configuração do LLM, retrieval e pipeline.
///
/// Configuração dinâmica via variáveis de ambiente:
///
/// **LLM:**
/// - `LLM_MODEL`: Modelo de chat (padrão: "gpt-4o-mini")
/// - `LLM_API_BASE_URL`: URL base customizada (opcional)
/// - `LLM_TEMPERATURE`: Temperatura (padrão: 0.0)
///
/// **Retrieval:**
/// - `RETRIEVAL_ENDPOINT`: Endpoint do serviço de busca vetorial
/// - `RETRIEVAL_TOP_K`: Passagens por busca (padrão: 5)
///
/// **Pipeline:**
/// - `PIPELINE_MAX_TOOL_ROUNDS`: Rodadas máximas da sessão de retrieval
pub mod config;

/// Servidor HTTP com API JSON (feature `server`).
#[cfg(feature = "server")]
pub mod server;

// Re-exports principais
pub use agent::{AnswerState, PipelineError, PipelineState, RagPipeline};
pub use config::{
    load_llm_config, load_pipeline_config, load_retrieval_config, LlmConfig, PipelineConfig,
    RetrievalConfig,
};
pub use types::{Message, MessageRole, ToolCall};

/// Versão da biblioteca.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude com imports comuns para uso rápido.
///
/// Importar tudo de uma vez:
/// ```rust,ignore
/// use agentic_rag::prelude::*;
/// ```
pub mod prelude {
    pub use crate::agent::{
        parse_planning_response, AnswerState, PipelineError, PipelineState, PlanningOutput,
        RagPipeline,
    };
    pub use crate::config::{LlmConfig, PipelineConfig, RetrievalConfig};
    pub use crate::llm::{LlmClient, MockLlmClient, OpenAiClient};
    pub use crate::retrieval::{HttpRetrievalClient, MockRetrievalClient, RetrievalClient};
    pub use crate::types::{Message, MessageRole, ToolCall};
}
