// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EXTRAÇÃO DE MENSAGENS DO HISTÓRICO
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::types::Message;

/// Retorna o conteúdo da mensagem mais recente que satisfaz o predicado.
///
/// Varre o histórico de trás para frente; determinístico para um histórico
/// fixo (sempre a ÚLTIMA mensagem que casa, nunca a primeira). Não muta o
/// histórico. Retorna `None` quando nenhuma mensagem casa.
pub fn extract_last<'a, P>(history: &'a [Message], predicate: P) -> Option<&'a str>
where
    P: Fn(&Message) -> bool,
{
    history
        .iter()
        .rev()
        .find(|msg| predicate(msg))
        .map(|msg| msg.content.as_str())
}

/// Conteúdo da última mensagem de autoria do modelo, ou `None`
pub fn extract_last_assistant(history: &[Message]) -> Option<&str> {
    extract_last(history, Message::is_assistant)
}

/// Conteúdo da última mensagem produzida por ferramenta, ou `None`
pub fn extract_last_tool(history: &[Message]) -> Option<&str> {
    extract_last(history, Message::is_tool)
}
