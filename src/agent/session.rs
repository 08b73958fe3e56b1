// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SESSÃO COM FERRAMENTA DE RETRIEVAL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Loop LLM↔ferramenta usado pelo estágio de retrieval. O modelo pode pedir
// zero ou mais buscas; cada resultado entra no histórico como mensagem Tool.
// O orquestrador só observa o histórico final.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::Deserialize;

use crate::agent::state::PipelineError;
use crate::llm::{ChatRequest, LlmClient};
use crate::retrieval::RetrievalClient;
use crate::types::Message;

/// Sessão de conversa com a ferramenta de retrieval acoplada.
///
/// A cada rodada o LLM é invocado com o histórico acumulado; tool calls
/// retornadas são despachadas ao [`RetrievalClient`] e os resultados
/// anexados ao histórico. Termina quando o modelo para de pedir buscas ou
/// quando `max_rounds` é atingido.
pub struct ToolSession<'a> {
    llm: &'a dyn LlmClient,
    tool: &'a dyn RetrievalClient,
    max_rounds: usize,
}

#[derive(Deserialize)]
struct ToolArguments {
    query: Option<String>,
}

/// Extrai a query do JSON de argumentos da tool call.
///
/// Argumentos malformados não abortam a sessão: o texto bruto vira a query.
fn query_from_arguments(arguments: &str) -> String {
    serde_json::from_str::<ToolArguments>(arguments)
        .ok()
        .and_then(|args| args.query)
        .unwrap_or_else(|| arguments.to_string())
}

impl<'a> ToolSession<'a> {
    pub fn new(llm: &'a dyn LlmClient, tool: &'a dyn RetrievalClient, max_rounds: usize) -> Self {
        Self {
            llm,
            tool,
            max_rounds,
        }
    }

    /// Executa a sessão e retorna o histórico completo da conversa.
    ///
    /// Falhas do LLM ou da ferramenta propagam imediatamente; o histórico
    /// parcial é descartado junto com o run.
    pub async fn run(
        &self,
        system: &str,
        instruction: String,
    ) -> Result<Vec<Message>, PipelineError> {
        let mut history = vec![Message::human(instruction)];

        for round in 0..self.max_rounds {
            let request = ChatRequest {
                system: system.to_string(),
                history: history.clone(),
                with_retrieval_tool: true,
            };

            let turn = self.llm.complete(&request).await?;
            let tool_calls = turn.tool_calls.clone();
            history.push(turn);

            if tool_calls.is_empty() {
                return Ok(history);
            }

            log::debug!(
                "Retrieval session round {}: {} tool call(s)",
                round + 1,
                tool_calls.len()
            );

            for call in tool_calls {
                let query = query_from_arguments(&call.arguments);
                let passages = self.tool.search(&query).await?;
                history.push(Message::tool(passages, call.id));
            }
        }

        log::warn!(
            "Retrieval session hit max rounds ({}) while the model still requested tools",
            self.max_rounds
        );
        Ok(history)
    }
}
