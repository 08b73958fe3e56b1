// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS COMPARTILHADOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

/// Papel de uma mensagem na conversa.
///
/// Conjunto fechado de variantes: toda mensagem no histórico é de autoria
/// humana, do modelo ou produzida por uma ferramenta externa. Pattern
/// matching exaustivo força o tratamento de todos os casos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Mensagem de autoria humana (pergunta ou instrução)
    #[serde(rename = "user")]
    Human,
    /// Mensagem de autoria do modelo
    Assistant,
    /// Mensagem produzida por uma ferramenta externa (retrieval)
    Tool,
}

impl MessageRole {
    /// Retorna o papel como string (formato wire OpenAI)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}

/// Pedido de invocação de ferramenta emitido pelo modelo.
///
/// `arguments` é o JSON bruto produzido pelo modelo (ex: `{"query": "..."}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// ID único da chamada (gerado pelo provedor)
    pub id: String,
    /// Nome da ferramenta solicitada
    pub name: String,
    /// Argumentos em JSON bruto
    pub arguments: String,
}

/// Uma entrada em um histórico de conversa.
///
/// Históricos são sequências ordenadas de mensagens, append-only dentro de
/// uma rodada de invocação. Os campos `tool_call_id` e `tool_calls` existem
/// apenas para fechar o round-trip de tool calls no formato wire; o núcleo
/// do pipeline nunca ramifica sobre eles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Classificação de papel da mensagem
    pub role: MessageRole,
    /// Conteúdo textual
    pub content: String,
    /// ID da tool call que esta mensagem responde (apenas role Tool)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool calls solicitadas pelo modelo (apenas role Assistant)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
}

impl Message {
    /// Cria uma mensagem de autoria humana
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Human,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Cria uma mensagem de autoria do modelo
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Cria uma mensagem do modelo que solicita tool calls
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            tool_call_id: None,
            tool_calls,
        }
    }

    /// Cria uma mensagem produzida por ferramenta
    pub fn tool(content: impl Into<String>, tool_call_id: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: Vec::new(),
        }
    }

    /// Verifica se a mensagem é de autoria do modelo
    pub fn is_assistant(&self) -> bool {
        self.role == MessageRole::Assistant
    }

    /// Verifica se a mensagem foi produzida por ferramenta
    pub fn is_tool(&self) -> bool {
        self.role == MessageRole::Tool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(MessageRole::Human.as_str(), "user");
        assert_eq!(MessageRole::Assistant.as_str(), "assistant");
        assert_eq!(MessageRole::Tool.as_str(), "tool");
    }

    #[test]
    fn test_constructors() {
        let msg = Message::human("hello");
        assert_eq!(msg.role, MessageRole::Human);
        assert!(msg.tool_call_id.is_none());

        let msg = Message::tool("chunks", "call_1");
        assert!(msg.is_tool());
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));

        let msg = Message::assistant("answer");
        assert!(msg.is_assistant());
        assert!(!msg.is_tool());
    }

    #[test]
    fn test_role_serde_format() {
        let json = serde_json::to_string(&MessageRole::Human).unwrap();
        assert_eq!(json, "\"user\"");
        let json = serde_json::to_string(&MessageRole::Tool).unwrap();
        assert_eq!(json, "\"tool\"");
    }
}
