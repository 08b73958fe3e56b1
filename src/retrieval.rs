// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CLIENTE DE RETRIEVAL
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Trait e implementações para busca vetorial de passagens.
// O pipeline nunca chama o backend diretamente; a sessão de retrieval
// invoca a ferramenta e o resultado aparece como mensagem Tool no histórico.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;

/// Erros do cliente de retrieval
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Retrieval API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Invalid response format: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Passagem retornada pelo backend de busca vetorial
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Texto da passagem
    pub text: String,
    /// Documento/página de origem
    #[serde(default)]
    pub source: Option<String>,
    /// Score de similaridade (0.0 - 1.0)
    #[serde(default)]
    pub score: Option<f32>,
}

/// Formata passagens como uma seção CONTEXT única para o modelo.
///
/// Cada chunk é numerado e carrega a referência de origem quando disponível.
pub fn format_passages(passages: &[Passage]) -> String {
    if passages.is_empty() {
        return String::new();
    }

    let mut output = String::from("CONTEXT:\n");
    for (i, passage) in passages.iter().enumerate() {
        output.push_str(&format!("\n[Chunk {}]", i + 1));
        if let Some(source) = &passage.source {
            output.push_str(&format!(" (source: {})", source));
        }
        output.push('\n');
        output.push_str(passage.text.trim());
        output.push('\n');
    }
    output
}

/// Trait principal para clientes de retrieval
///
/// Define a interface de busca: uma query focada entra, passagens
/// consolidadas em texto saem.
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Busca passagens relevantes para a query
    async fn search(&self, query: &str) -> Result<String, RetrievalError>;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO MOCK PARA TESTES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente mock para testes unitários
#[derive(Debug, Default)]
pub struct MockRetrievalClient {
    pub mock_passages: Option<String>,
    pub fail: bool,
}

impl MockRetrievalClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock que retorna sempre o mesmo bloco de passagens
    pub fn with_passages(passages: impl Into<String>) -> Self {
        Self {
            mock_passages: Some(passages.into()),
            fail: false,
        }
    }

    /// Mock que falha em toda busca
    pub fn failing() -> Self {
        Self {
            mock_passages: None,
            fail: true,
        }
    }
}

#[async_trait]
impl RetrievalClient for MockRetrievalClient {
    async fn search(&self, query: &str) -> Result<String, RetrievalError> {
        if self.fail {
            return Err(RetrievalError::ApiError("mock failure".into()));
        }

        Ok(self
            .mock_passages
            .clone()
            .unwrap_or_else(|| format!("CONTEXT:\n\n[Chunk 1]\nMock passage for: {}\n", query)))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// IMPLEMENTAÇÃO HTTP (serviço de busca vetorial)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Cliente para um serviço de busca vetorial via HTTP.
///
/// Envia `POST {endpoint}` com `{"query": ..., "top_k": ...}` e espera
/// `{"passages": [{"text", "source", "score"}]}`.
pub struct HttpRetrievalClient {
    endpoint: String,
    api_key: Option<String>,
    top_k: usize,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    passages: Vec<Passage>,
}

impl HttpRetrievalClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            api_key: None,
            top_k: 5,
            client: reqwest::Client::new(),
        }
    }

    /// Cria o cliente a partir da configuração carregada do ambiente
    pub fn from_config(config: &RetrievalConfig, api_key: Option<String>) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key,
            top_k: config.top_k,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

#[async_trait]
impl RetrievalClient for HttpRetrievalClient {
    async fn search(&self, query: &str) -> Result<String, RetrievalError> {
        let mut request = self.client.post(&self.endpoint).json(&SearchRequest {
            query,
            top_k: self.top_k,
        });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RetrievalError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(RetrievalError::RateLimitError);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::ParseError(e.to_string()))?;

        log::debug!(
            "Retrieval returned {} passages for query: {}",
            parsed.passages.len(),
            query
        );

        Ok(format_passages(&parsed.passages))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_passages_empty() {
        assert_eq!(format_passages(&[]), "");
    }

    #[test]
    fn test_format_passages_numbering_and_source() {
        let passages = vec![
            Passage {
                text: "HNSW is a graph-based index.".into(),
                source: Some("paper.pdf p.3".into()),
                score: Some(0.91),
            },
            Passage {
                text: "It trades memory for speed.".into(),
                source: None,
                score: None,
            },
        ];

        let formatted = format_passages(&passages);
        assert!(formatted.starts_with("CONTEXT:"));
        assert!(formatted.contains("[Chunk 1] (source: paper.pdf p.3)"));
        assert!(formatted.contains("[Chunk 2]\n"));
        assert!(formatted.contains("It trades memory for speed."));
    }

    #[tokio::test]
    async fn test_mock_search() {
        let client = MockRetrievalClient::new();
        let result = client.search("test query").await.unwrap();
        assert!(result.contains("test query"));
    }

    #[tokio::test]
    async fn test_mock_search_failing() {
        let client = MockRetrievalClient::failing();
        let result = client.search("test query").await;
        assert!(matches!(result, Err(RetrievalError::ApiError(_))));
    }
}
