//! # Testes de Integração
//!
//! Este módulo contém testes de integração que validam o fluxo completo do
//! pipeline com clientes mock roteirizados:
//! - Planning → Retrieval: o plano parseado guia a instrução de retrieval
//! - Retrieval → Summarization → Verification: o contexto recuperado atravessa
//!   os estágios finais
//! - Modos enhanced vs fallback da instrução de retrieval
//! - Abortos: pergunta vazia e falha de estágio

use agentic_rag::llm::RETRIEVAL_TOOL_NAME;
use agentic_rag::prelude::*;
use std::sync::Arc;

fn tool_call(id: &str, query: &str) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: RETRIEVAL_TOOL_NAME.to_string(),
        arguments: format!(r#"{{"query":"{}"}}"#, query),
    }
}

// ============================================================================
// TESTE 1: Pergunta multi-parte → plano com múltiplas sub-questions
// Verifica que o planejamento decomposto atravessa o pipeline inteiro e que
// a sessão de retrieval recebe a instrução enhanced
// ============================================================================

#[tokio::test]
async fn test_multi_part_question_enhanced_retrieval() {
    // 1. Roteirizar as respostas dos quatro estágios
    let planning_response = "\
PLAN: Two parts: advantages comparison and scalability. Search each separately.

SUB-QUESTIONS:
1. \"vector database advantages benefits\"
2. \"vector database vs relational database comparison\"
3. \"vector database scalability architecture\"";

    let llm = Arc::new(MockLlmClient::with_responses(vec![
        Message::assistant(planning_response),
        // Sessão de retrieval: duas buscas e depois a consolidação
        Message::assistant_with_tools("", vec![tool_call("call_1", "vector database advantages")]),
        Message::assistant_with_tools("", vec![tool_call("call_2", "scalability architecture")]),
        Message::assistant("CONTEXT consolidated by the model"),
        Message::assistant("Draft: vector databases index embeddings and scale horizontally."),
        Message::assistant("Vector databases index embeddings and scale horizontally."),
    ]));
    let tool = Arc::new(MockRetrievalClient::with_passages(
        "[Chunk 1] Vector databases store embeddings.",
    ));

    let pipeline = RagPipeline::new(llm.clone(), tool, PipelineConfig::default());

    // 2. Executar o run completo
    let state = pipeline
        .run("What are the advantages of vector databases, and how do they scale?")
        .await
        .unwrap();

    // 3. Planejamento decomposto: plano + 3 sub-questions
    assert_eq!(
        state.plan.as_deref(),
        Some("Two parts: advantages comparison and scalability. Search each separately.")
    );
    let subs = state.sub_questions.as_deref().unwrap();
    assert_eq!(subs.len(), 3);
    assert_eq!(subs[0], "vector database advantages benefits");

    // 4. A sessão de retrieval recebeu a instrução ENHANCED (plano + focus areas)
    let requests = llm.recorded_requests();
    let retrieval_instruction = &requests[1].history[0].content;
    assert!(retrieval_instruction.contains("SEARCH STRATEGY:"));
    assert!(retrieval_instruction.contains("FOCUS AREAS"));
    assert!(retrieval_instruction.contains("1. vector database advantages benefits"));
    assert!(requests[1].with_retrieval_tool);

    // 5. O contexto vem da última mensagem de ferramenta da sessão
    assert_eq!(
        state.context.as_deref(),
        Some("[Chunk 1] Vector databases store embeddings.")
    );

    // 6. Rascunho e resposta final populados na ordem dos estágios
    assert_eq!(
        state.draft_answer.as_deref(),
        Some("Draft: vector databases index embeddings and scale horizontally.")
    );
    assert_eq!(
        state.answer.as_deref(),
        Some("Vector databases index embeddings and scale horizontally.")
    );
}

// ============================================================================
// TESTE 2: Pergunta simples → pelo menos uma sub-question
// ============================================================================

#[tokio::test]
async fn test_simple_question_single_sub_question() {
    let llm = Arc::new(MockLlmClient::with_responses(vec![
        Message::assistant("PLAN: Single definitional search.\n\nSUB-QUESTIONS:\n1. \"HNSW indexing algorithm\""),
        Message::assistant_with_tools("", vec![tool_call("call_1", "HNSW indexing algorithm")]),
        Message::assistant("done"),
        Message::assistant("HNSW is a graph-based index."),
        Message::assistant("HNSW is a graph-based approximate nearest neighbor index."),
    ]));
    let tool = Arc::new(MockRetrievalClient::with_passages("[Chunk 1] HNSW builds layers."));

    let pipeline = RagPipeline::new(llm, tool, PipelineConfig::default());
    let state = pipeline.run("What is HNSW indexing?").await.unwrap();

    let subs = state.sub_questions.as_deref().unwrap();
    assert!(!subs.is_empty());
    assert_eq!(subs[0], "HNSW indexing algorithm");
    assert_eq!(
        state.answer.as_deref(),
        Some("HNSW is a graph-based approximate nearest neighbor index.")
    );
}

// ============================================================================
// TESTE 3: Planejamento sem marcadores → retrieval em modo FALLBACK
// A resposta de planejamento vira plano inteiro sem sub-questions parseáveis;
// a instrução de retrieval é a pergunta original, sem modificação
// ============================================================================

#[tokio::test]
async fn test_unparseable_plan_falls_back_to_direct_question() {
    let llm = Arc::new(MockLlmClient::with_responses(vec![
        // Sem PLAN:/SUB-QUESTIONS e sem substrings entre aspas
        Message::assistant("I will just search for the answer directly."),
        Message::assistant("no searches needed"),
        Message::assistant("draft"),
        Message::assistant("final"),
    ]));
    let tool = Arc::new(MockRetrievalClient::with_passages("unused"));

    let pipeline = RagPipeline::new(llm.clone(), tool, PipelineConfig::default());
    let state = pipeline.run("What is a vector database?").await.unwrap();

    // Fallback do parser: entrada inteira vira plano, entrada inteira vira
    // a única sub-question
    assert_eq!(
        state.plan.as_deref(),
        Some("I will just search for the answer directly.")
    );
    assert_eq!(
        state.sub_questions.as_deref(),
        Some(&["I will just search for the answer directly.".to_string()][..])
    );

    // Plano e sub-questions presentes ⇒ ainda é modo enhanced; o fallback de
    // instrução só dispara quando um dos dois é vazio
    let requests = llm.recorded_requests();
    assert!(requests[1].history[0].content.contains("SEARCH STRATEGY:"));
    assert_eq!(state.context.as_deref(), Some(""));
}

// ============================================================================
// TESTE 4: Sessão sem nenhuma tool call → contexto vazio, pipeline segue
// ============================================================================

#[tokio::test]
async fn test_no_tool_calls_yields_empty_context() {
    let llm = Arc::new(MockLlmClient::with_responses(vec![
        Message::assistant("PLAN: direct.\nSUB-QUESTIONS:\n1. \"q\""),
        // O modelo responde sem chamar a ferramenta
        Message::assistant("I found nothing to search."),
        Message::assistant("cannot answer based on the available document"),
        Message::assistant("cannot answer based on the available document"),
    ]));
    let tool = Arc::new(MockRetrievalClient::with_passages("never requested"));

    let pipeline = RagPipeline::new(llm, tool, PipelineConfig::default());
    let state = pipeline.run("Anything in the docs?").await.unwrap();

    assert_eq!(state.context.as_deref(), Some(""));
    assert_eq!(
        state.answer.as_deref(),
        Some("cannot answer based on the available document")
    );
}

// ============================================================================
// TESTE 5: Abortos — pergunta vazia e falha de estágio
// ============================================================================

#[tokio::test]
async fn test_empty_question_rejected_without_calls() {
    let llm = Arc::new(MockLlmClient::failing());
    let pipeline = RagPipeline::new(
        llm.clone(),
        Arc::new(MockRetrievalClient::failing()),
        PipelineConfig::default(),
    );

    let result = pipeline.run("  \n ").await;
    assert!(matches!(result, Err(PipelineError::EmptyQuestion)));

    // Nenhum estágio rodou
    assert!(llm.recorded_requests().is_empty());
}

#[tokio::test]
async fn test_retrieval_failure_aborts_whole_run() {
    let llm = Arc::new(MockLlmClient::with_responses(vec![
        Message::assistant("PLAN: p.\nSUB-QUESTIONS:\n1. \"q\""),
        Message::assistant_with_tools("", vec![tool_call("call_1", "q")]),
    ]));
    // A ferramenta de busca falha na primeira chamada
    let tool = Arc::new(MockRetrievalClient::failing());

    let pipeline = RagPipeline::new(llm, tool, PipelineConfig::default());
    let result = pipeline.run("a question").await;

    assert!(matches!(result, Err(PipelineError::Retrieval(_))));
}
