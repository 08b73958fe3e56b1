// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PIPELINE DE QA MULTI-AGENTE - MÁQUINA DE ESTADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod extract;
mod planner;
/// Prompts de sistema dos agentes e builders de conteúdo de usuário.
pub mod prompts;
mod session;
mod stages;
mod state;

pub use extract::{extract_last, extract_last_assistant, extract_last_tool};
pub use planner::parse_planning_response;
pub use session::ToolSession;
pub use stages::{PlanningStage, RetrievalStage, SummarizationStage, VerificationStage};
pub use state::{AnswerState, PipelineError, PipelineState, PlanningOutput};

use std::sync::Arc;
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::llm::LlmClient;
use crate::retrieval::RetrievalClient;

/// Orquestrador do pipeline de QA.
///
/// Detém os quatro estágios e executa a sequência fixa
/// `Planning → Retrieval → Summarization → Verification`, fazendo o merge
/// da saída de cada estágio no [`AnswerState`]. Os colaboradores são
/// injetados na construção — sem singletons compartilhados, cada run tem
/// estado independente e os testes substituem os clientes por mocks.
pub struct RagPipeline {
    planning: PlanningStage,
    retrieval: RetrievalStage,
    summarization: SummarizationStage,
    verification: VerificationStage,
}

impl RagPipeline {
    /// Cria o pipeline com os colaboradores e configuração dados
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tool: Arc<dyn RetrievalClient>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            planning: PlanningStage::new(llm.clone()),
            retrieval: RetrievalStage::new(llm.clone(), tool, config.max_tool_rounds),
            summarization: SummarizationStage::new(llm.clone()),
            verification: VerificationStage::new(llm),
        }
    }

    /// Executa o pipeline completo para uma pergunta.
    ///
    /// Pré-condição: pergunta não vazia — viola e falha rápido, antes de
    /// qualquer estágio rodar. Qualquer falha de invocação aborta o run
    /// inteiro; nenhum estado parcial é retornado.
    pub async fn run(&self, question: &str) -> Result<AnswerState, PipelineError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }

        let run_id = Uuid::new_v4();
        log::info!("[{}] Pipeline start: {}", run_id, question);

        let mut phase = PipelineState::Init;
        let mut state = AnswerState::new(question);

        // Planning
        let planning = self.planning.run(&state.question).await?;
        state = state.with_planning(planning);
        phase = Self::advance(phase, PipelineState::Planned);

        // Retrieval
        let context = self
            .retrieval
            .run(
                &state.question,
                state.plan.as_deref(),
                state.sub_questions.as_deref(),
            )
            .await?;
        state = state.with_context(context);
        phase = Self::advance(phase, PipelineState::Retrieved);

        // Summarization
        let draft = self
            .summarization
            .run(&state.question, state.context.as_deref().unwrap_or(""))
            .await?;
        state = state.with_draft(draft);
        phase = Self::advance(phase, PipelineState::Drafted);

        // Verification
        let answer = self
            .verification
            .run(
                &state.question,
                state.context.as_deref().unwrap_or(""),
                state.draft_answer.as_deref().unwrap_or(""),
            )
            .await?;
        state = state.with_answer(answer);
        phase = Self::advance(phase, PipelineState::Verified);

        debug_assert!(phase.is_terminal());
        log::info!(
            "[{}] Pipeline complete: answer {} chars, context {} chars",
            run_id,
            state.answer.as_deref().unwrap_or("").len(),
            state.context.as_deref().unwrap_or("").len()
        );

        Ok(state)
    }

    fn advance(from: PipelineState, to: PipelineState) -> PipelineState {
        debug_assert!(
            from.can_transition_to(&to),
            "invalid pipeline transition: {:?} -> {:?}",
            from,
            to
        );
        to
    }
}
