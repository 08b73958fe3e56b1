// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTÁGIOS DO PIPELINE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Os quatro estágios do pipeline de QA. Cada estágio invoca o LLM uma vez
// (o de retrieval via sessão com ferramenta), extrai a mensagem relevante
// do histórico resultante e devolve sua saída como valor imutável.
// Extração vazia vira string vazia; falha de invocação propaga.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::Arc;

use crate::agent::extract::{extract_last_assistant, extract_last_tool};
use crate::agent::planner::parse_planning_response;
use crate::agent::prompts::{
    build_planning_input, build_retrieval_instruction, build_summarization_input,
    build_verification_input, PLANNING_SYSTEM_PROMPT, RETRIEVAL_SYSTEM_PROMPT,
    SUMMARIZATION_SYSTEM_PROMPT, VERIFICATION_SYSTEM_PROMPT,
};
use crate::agent::session::ToolSession;
use crate::agent::state::{PipelineError, PlanningOutput};
use crate::llm::{ChatRequest, LlmClient};
use crate::retrieval::RetrievalClient;
use crate::types::Message;

/// Estágio de planejamento: decompõe a pergunta em plano + sub-questions.
pub struct PlanningStage {
    llm: Arc<dyn LlmClient>,
}

impl PlanningStage {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Invoca o LLM com a pergunta e faz o parse da resposta livre.
    ///
    /// Nunca falha por ambiguidade de parse (política de fallback do
    /// parser); falha de invocação propaga sem retry.
    pub async fn run(&self, question: &str) -> Result<PlanningOutput, PipelineError> {
        let request = ChatRequest::simple(PLANNING_SYSTEM_PROMPT, build_planning_input(question));
        let turn = self.llm.complete(&request).await?;

        let mut history = request.history;
        history.push(turn);

        let raw = extract_last_assistant(&history).unwrap_or("");
        let (plan, sub_questions) = parse_planning_response(raw);

        log::info!(
            "Planning produced {} sub-question(s), plan: {} chars",
            sub_questions.len(),
            plan.len()
        );

        Ok(PlanningOutput {
            plan,
            sub_questions,
        })
    }
}

/// Estágio de retrieval: coleta contexto via sessão com ferramenta.
pub struct RetrievalStage {
    llm: Arc<dyn LlmClient>,
    tool: Arc<dyn RetrievalClient>,
    max_tool_rounds: usize,
}

impl RetrievalStage {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tool: Arc<dyn RetrievalClient>,
        max_tool_rounds: usize,
    ) -> Self {
        Self {
            llm,
            tool,
            max_tool_rounds,
        }
    }

    /// Monta a instrução (enhanced ou fallback), roda a sessão e extrai a
    /// última mensagem Tool do histórico. Nenhuma mensagem Tool não é erro:
    /// o contexto fica vazio e os estágios seguintes toleram isso.
    pub async fn run(
        &self,
        question: &str,
        plan: Option<&str>,
        sub_questions: Option<&[String]>,
    ) -> Result<String, PipelineError> {
        let instruction = build_retrieval_instruction(question, plan, sub_questions);
        if instruction == question {
            log::info!("No planning information available - using direct question");
        }

        let session = ToolSession::new(self.llm.as_ref(), self.tool.as_ref(), self.max_tool_rounds);
        let history = session.run(RETRIEVAL_SYSTEM_PROMPT, instruction).await?;

        let context = extract_last_tool(&history).unwrap_or("").to_string();
        log::info!("Retrieved context: {} chars", context.len());

        Ok(context)
    }
}

/// Estágio de sumarização: gera rascunho de resposta a partir do contexto.
pub struct SummarizationStage {
    llm: Arc<dyn LlmClient>,
}

impl SummarizationStage {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn run(&self, question: &str, context: &str) -> Result<String, PipelineError> {
        let request = ChatRequest::simple(
            SUMMARIZATION_SYSTEM_PROMPT,
            build_summarization_input(question, context),
        );
        let turn = self.llm.complete(&request).await?;

        let mut history = request.history;
        history.push(turn);

        Ok(extract_last_assistant(&history).unwrap_or("").to_string())
    }
}

/// Estágio de verificação: corrige o rascunho removendo claims sem suporte.
///
/// A checagem de grounding em si é delegada ao modelo; a responsabilidade
/// aqui é apenas o roteamento correto das mensagens.
pub struct VerificationStage {
    llm: Arc<dyn LlmClient>,
}

impl VerificationStage {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn run(
        &self,
        question: &str,
        context: &str,
        draft_answer: &str,
    ) -> Result<String, PipelineError> {
        let request = ChatRequest::simple(
            VERIFICATION_SYSTEM_PROMPT,
            build_verification_input(question, context, draft_answer),
        );
        let turn = self.llm.complete(&request).await?;

        let mut history = request.history;
        history.push(turn);

        Ok(extract_last_assistant(&history).unwrap_or("").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MockLlmClient, RETRIEVAL_TOOL_NAME};
    use crate::retrieval::MockRetrievalClient;
    use crate::types::ToolCall;

    #[tokio::test]
    async fn test_planning_stage_parses_response() {
        let llm = Arc::new(MockLlmClient::with_responses(vec![Message::assistant(
            "PLAN: Find definitions.\nSUB-QUESTIONS:\n1. \"hnsw algorithm\"",
        )]));
        let stage = PlanningStage::new(llm);

        let output = stage.run("What is HNSW indexing?").await.unwrap();
        assert_eq!(output.plan, "Find definitions.");
        assert_eq!(output.sub_questions, vec!["hnsw algorithm"]);
    }

    #[tokio::test]
    async fn test_planning_stage_propagates_llm_failure() {
        let stage = PlanningStage::new(Arc::new(MockLlmClient::failing()));
        let result = stage.run("q").await;
        assert!(matches!(result, Err(PipelineError::Llm(_))));
    }

    #[tokio::test]
    async fn test_retrieval_stage_extracts_last_tool_message() {
        let llm = Arc::new(MockLlmClient::with_responses(vec![
            Message::assistant_with_tools(
                "",
                vec![ToolCall {
                    id: "call_1".into(),
                    name: RETRIEVAL_TOOL_NAME.into(),
                    arguments: r#"{"query":"hnsw"}"#.into(),
                }],
            ),
            Message::assistant("consolidated context summary"),
        ]));
        let tool = Arc::new(MockRetrievalClient::with_passages("the retrieved chunks"));
        let stage = RetrievalStage::new(llm, tool, 6);

        let subs = vec!["hnsw algorithm".to_string()];
        let context = stage
            .run("What is HNSW?", Some("find it"), Some(&subs))
            .await
            .unwrap();

        assert_eq!(context, "the retrieved chunks");
    }

    #[tokio::test]
    async fn test_retrieval_stage_empty_context_when_no_tool_message() {
        // Modelo responde direto sem chamar a ferramenta
        let llm = Arc::new(MockLlmClient::with_responses(vec![Message::assistant(
            "I will not search",
        )]));
        let tool = Arc::new(MockRetrievalClient::new());
        let stage = RetrievalStage::new(llm, tool, 6);

        let context = stage.run("question", None, None).await.unwrap();
        assert_eq!(context, "");
    }

    #[tokio::test]
    async fn test_summarization_stage_returns_assistant_content() {
        let llm = Arc::new(MockLlmClient::with_responses(vec![Message::assistant(
            "draft grounded in context",
        )]));
        let stage = SummarizationStage::new(llm);

        let draft = stage.run("question", "some context").await.unwrap();
        assert_eq!(draft, "draft grounded in context");
    }

    #[tokio::test]
    async fn test_verification_stage_returns_assistant_content() {
        let llm = Arc::new(MockLlmClient::with_responses(vec![Message::assistant(
            "final corrected answer",
        )]));
        let stage = VerificationStage::new(llm);

        let answer = stage.run("question", "context", "draft").await.unwrap();
        assert_eq!(answer, "final corrected answer");
    }
}
