// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ESTADO DO PIPELINE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

use crate::llm::LlmError;
use crate::retrieval::RetrievalError;

/// Registro de resposta atravessando o pipeline.
///
/// Criado um por pergunta, nunca compartilhado entre runs. Os campos são
/// populados monotonicamente na ordem dos estágios e nunca limpos dentro de
/// um run; cada estágio lê apenas campos já presentes. `Some("")` é um
/// valor válido ("estágio rodou e produziu vazio"), distinto de `None`
/// ("estágio ainda não rodou").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerState {
    /// Pergunta original — imutável após a criação
    pub question: String,
    /// Estratégia de busca produzida pelo planejamento
    pub plan: Option<String>,
    /// Sub-questions em ordem de prioridade de decomposição
    pub sub_questions: Option<Vec<String>>,
    /// Evidência consolidada recuperada
    pub context: Option<String>,
    /// Rascunho de resposta gerado só a partir do contexto
    pub draft_answer: Option<String>,
    /// Resposta final verificada — saída terminal do pipeline
    pub answer: Option<String>,
}

impl AnswerState {
    /// Cria um estado novo para uma pergunta
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            plan: None,
            sub_questions: None,
            context: None,
            draft_answer: None,
            answer: None,
        }
    }

    /// Merge da saída do estágio de planejamento
    pub fn with_planning(mut self, output: PlanningOutput) -> Self {
        self.plan = Some(output.plan);
        self.sub_questions = Some(output.sub_questions);
        self
    }

    /// Merge da saída do estágio de retrieval
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }

    /// Merge da saída do estágio de sumarização
    pub fn with_draft(mut self, draft_answer: String) -> Self {
        self.draft_answer = Some(draft_answer);
        self
    }

    /// Merge da saída do estágio de verificação
    pub fn with_answer(mut self, answer: String) -> Self {
        self.answer = Some(answer);
        self
    }
}

/// Saída imutável do estágio de planejamento
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningOutput {
    /// Estratégia de busca em texto livre (vazio é válido)
    pub plan: String,
    /// Queries de busca focadas, em ordem de prioridade
    pub sub_questions: Vec<String>,
}

/// Estágio do pipeline — transições explícitas.
///
/// A máquina de estados garante a sequência fixa
/// `Init → Planned → Retrieved → Drafted → Verified`; nenhuma transição
/// pode ser pulada ou reordenada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Estado inicial, pergunta recebida
    Init,
    /// Planejamento concluído (plan + sub_questions no estado)
    Planned,
    /// Retrieval concluído (context no estado)
    Retrieved,
    /// Sumarização concluída (draft_answer no estado)
    Drafted,
    /// Verificação concluída — estado terminal
    Verified,
}

impl PipelineState {
    /// Próximo estágio na sequência fixa, se houver
    pub fn next(&self) -> Option<PipelineState> {
        match self {
            Self::Init => Some(Self::Planned),
            Self::Planned => Some(Self::Retrieved),
            Self::Retrieved => Some(Self::Drafted),
            Self::Drafted => Some(Self::Verified),
            Self::Verified => None,
        }
    }

    /// Verifica se o estado é terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Verifica se uma transição é válida (apenas o próximo da sequência)
    pub fn can_transition_to(&self, target: &PipelineState) -> bool {
        self.next() == Some(*target)
    }
}

/// Erros do pipeline de QA.
///
/// Falhas de invocação propagam sem retry nem degradação; o chamador
/// (CLI ou servidor) traduz para o erro visível ao usuário.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Violação de pré-condição: pergunta ausente ou em branco
    #[error("question must not be empty")]
    EmptyQuestion,

    /// Falha de invocação do LLM em algum estágio
    #[error("LLM invocation failed: {0}")]
    Llm(#[from] LlmError),

    /// Falha da ferramenta de retrieval dentro da sessão
    #[error("retrieval invocation failed: {0}")]
    Retrieval(#[from] RetrievalError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_sequence() {
        assert_eq!(PipelineState::Init.next(), Some(PipelineState::Planned));
        assert_eq!(PipelineState::Planned.next(), Some(PipelineState::Retrieved));
        assert_eq!(PipelineState::Retrieved.next(), Some(PipelineState::Drafted));
        assert_eq!(PipelineState::Drafted.next(), Some(PipelineState::Verified));
        assert_eq!(PipelineState::Verified.next(), None);
    }

    #[test]
    fn test_no_skipping_transitions() {
        assert!(PipelineState::Init.can_transition_to(&PipelineState::Planned));
        assert!(!PipelineState::Init.can_transition_to(&PipelineState::Retrieved));
        assert!(!PipelineState::Planned.can_transition_to(&PipelineState::Verified));
        assert!(!PipelineState::Verified.can_transition_to(&PipelineState::Init));
    }

    #[test]
    fn test_is_terminal() {
        assert!(PipelineState::Verified.is_terminal());
        assert!(!PipelineState::Drafted.is_terminal());
    }

    #[test]
    fn test_answer_state_monotonic_population() {
        let state = AnswerState::new("what is HNSW?");
        assert!(state.plan.is_none());

        let state = state.with_planning(PlanningOutput {
            plan: "search for definitions".into(),
            sub_questions: vec!["HNSW algorithm".into()],
        });
        let state = state.with_context("CONTEXT: ...".into());
        let state = state.with_draft("draft".into());
        let state = state.with_answer("answer".into());

        // Campos anteriores permanecem após merges posteriores
        assert_eq!(state.question, "what is HNSW?");
        assert_eq!(state.plan.as_deref(), Some("search for definitions"));
        assert_eq!(state.context.as_deref(), Some("CONTEXT: ..."));
        assert_eq!(state.draft_answer.as_deref(), Some("draft"));
        assert_eq!(state.answer.as_deref(), Some("answer"));
    }

    #[test]
    fn test_empty_string_distinct_from_absent() {
        let state = AnswerState::new("q").with_planning(PlanningOutput {
            plan: String::new(),
            sub_questions: vec![],
        });
        assert_eq!(state.plan.as_deref(), Some(""));
        assert_eq!(state.sub_questions.as_deref(), Some(&[][..]));
        assert!(state.context.is_none());
    }
}
