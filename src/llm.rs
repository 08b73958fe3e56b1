// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE LLM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para invocação de modelos de linguagem.
// O pipeline trata a invocação como opaca: entra um prompt + histórico,
// sai um turno do assistente (possivelmente com tool calls).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::config::LlmConfig;
use crate::types::{Message, MessageRole, ToolCall};

/// Erros do cliente LLM
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Invalid response format: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Requisição de chat para o LLM.
///
/// `with_retrieval_tool` declara a ferramenta de busca para o modelo; apenas
/// a sessão de retrieval usa isso.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Prompt de sistema que define o comportamento do agente
    pub system: String,
    /// Histórico ordenado da conversa até aqui
    pub history: Vec<Message>,
    /// Se a ferramenta de retrieval deve ser declarada ao modelo
    pub with_retrieval_tool: bool,
}

impl ChatRequest {
    /// Cria uma requisição simples (sem ferramentas) com uma mensagem humana
    pub fn simple(system: impl Into<String>, user_content: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            history: vec![Message::human(user_content)],
            with_retrieval_tool: false,
        }
    }
}

/// Nome da ferramenta de retrieval exposta ao modelo
pub const RETRIEVAL_TOOL_NAME: &str = "search_documents";

/// Trait principal para clientes LLM
///
/// Define a interface que qualquer provedor deve implementar. Permite fácil
/// substituição entre provedores e injeção de mocks nos testes.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Executa um turno de chat e retorna a mensagem do assistente.
    ///
    /// A mensagem retornada pode carregar tool calls quando a requisição
    /// declarou a ferramenta de retrieval.
    async fn complete(&self, request: &ChatRequest) -> Result<Message, LlmError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente mock para testes unitários e de integração.
///
/// Retorna respostas pré-programadas em ordem FIFO; esgotadas as respostas,
/// devolve um turno padrão. `failing()` cria um mock que sempre falha.
/// Toda requisição recebida fica gravada para inspeção posterior.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<ChatRequest>>,
    fail: bool,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock com fila de respostas pré-programadas
    pub fn with_responses(responses: Vec<Message>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Mock que falha em toda invocação
    pub fn failing() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Cópia das requisições recebidas, em ordem de chegada
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|reqs| reqs.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Message, LlmError> {
        if let Ok(mut reqs) = self.requests.lock() {
            reqs.push(request.clone());
        }

        if self.fail {
            return Err(LlmError::ApiError("mock failure".into()));
        }

        let mut queue = self
            .responses
            .lock()
            .map_err(|_| LlmError::ApiError("mock lock poisoned".into()))?;

        Ok(queue
            .pop_front()
            .unwrap_or_else(|| Message::assistant("Mock answer")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO OPENAI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente para a API OpenAI Chat Completions
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com/v1".into(),
            temperature: 0.0,
            client: reqwest::Client::new(),
        }
    }

    /// Cria o cliente a partir da configuração carregada do ambiente
    pub fn from_config(api_key: String, config: &LlmConfig) -> Self {
        Self {
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.into();
        self
    }

    fn tool_declaration() -> serde_json::Value {
        serde_json::json!([{
            "type": "function",
            "function": {
                "name": RETRIEVAL_TOOL_NAME,
                "description": "Search the document knowledge base for passages relevant to a query. May be called multiple times with different queries.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Focused search query"
                        }
                    },
                    "required": ["query"]
                }
            }
        }])
    }
}

// ─────────────────────────────────────────────────
// Wire format (OpenAI Chat Completions)
// ─────────────────────────────────────────────────

#[derive(Serialize)]
struct WireFunctionCall<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Serialize)]
struct WireToolCall<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    call_type: &'static str,
    function: WireFunctionCall<'a>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall<'a>>>,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
}

#[derive(Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireResponseToolCall>,
}

#[derive(Deserialize)]
struct WireResponseToolCall {
    id: String,
    function: WireResponseFunction,
}

#[derive(Deserialize)]
struct WireResponseFunction {
    name: String,
    arguments: String,
}

fn to_wire_messages<'a>(system: &'a str, history: &'a [Message]) -> Vec<WireMessage<'a>> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(WireMessage {
        role: "system",
        content: system,
        tool_call_id: None,
        tool_calls: None,
    });

    for msg in history {
        let tool_calls = if msg.role == MessageRole::Assistant && !msg.tool_calls.is_empty() {
            Some(
                msg.tool_calls
                    .iter()
                    .map(|tc| WireToolCall {
                        id: &tc.id,
                        call_type: "function",
                        function: WireFunctionCall {
                            name: &tc.name,
                            arguments: &tc.arguments,
                        },
                    })
                    .collect(),
            )
        } else {
            None
        };

        messages.push(WireMessage {
            role: msg.role.as_str(),
            content: &msg.content,
            tool_call_id: msg.tool_call_id.as_deref(),
            tool_calls,
        });
    }

    messages
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Message, LlmError> {
        let wire_request = WireRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: to_wire_messages(&request.system, &request.history),
            tools: request.with_retrieval_tool.then(Self::tool_declaration),
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimitError);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::ParseError("empty choices".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect::<Vec<_>>();

        let content = choice.message.content.unwrap_or_default();
        Ok(Message::assistant_with_tools(content, tool_calls))
    }
}
