// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DO LLM, RETRIEVAL E PIPELINE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Configuração do cliente LLM.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Modelo de chat usado por todos os quatro estágios.
    /// Padrão: "gpt-4o-mini"
    pub model: String,

    /// URL base da API (permite proxies/compatíveis).
    /// Padrão: "https://api.openai.com/v1"
    pub base_url: String,

    /// Temperatura de geração.
    /// Padrão: 0.0 (planejamento e verificação precisam de determinismo)
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: 0.0,
        }
    }
}

/// Configuração do backend de retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    /// Endpoint HTTP do serviço de busca vetorial.
    /// Padrão: "http://localhost:6333/search"
    pub endpoint: String,

    /// Número de passagens por busca.
    /// Padrão: 5
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:6333/search".to_string(),
            top_k: 5,
        }
    }
}

/// Configuração do pipeline de QA.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Máximo de rodadas LLM↔ferramenta na sessão de retrieval.
    /// Padrão: 6
    pub max_tool_rounds: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { max_tool_rounds: 6 }
    }
}

/// Carrega configuração do LLM a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `LLM_MODEL`: Modelo de chat (padrão: "gpt-4o-mini")
/// - `LLM_API_BASE_URL`: URL base customizada (opcional)
/// - `LLM_TEMPERATURE`: Temperatura (padrão: 0.0)
pub fn load_llm_config() -> LlmConfig {
    let mut config = LlmConfig::default();

    if let Ok(model) = std::env::var("LLM_MODEL") {
        if !model.trim().is_empty() {
            config.model = model.trim().to_string();
            log::info!("📦 LLM_MODEL={}", config.model);
        }
    }

    if let Ok(base_url) = std::env::var("LLM_API_BASE_URL") {
        if !base_url.trim().is_empty() {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
            log::info!("📦 LLM_API_BASE_URL={}", config.base_url);
        }
    }

    if let Ok(temp_str) = std::env::var("LLM_TEMPERATURE") {
        if let Ok(temp) = temp_str.trim().parse::<f32>() {
            if (0.0..=2.0).contains(&temp) {
                config.temperature = temp;
                log::info!("📦 LLM_TEMPERATURE={}", temp);
            }
        }
    }

    config
}

/// Carrega configuração do retrieval a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `RETRIEVAL_ENDPOINT`: Endpoint do serviço de busca (padrão: localhost)
/// - `RETRIEVAL_TOP_K`: Passagens por busca (padrão: 5)
pub fn load_retrieval_config() -> RetrievalConfig {
    let mut config = RetrievalConfig::default();

    if let Ok(endpoint) = std::env::var("RETRIEVAL_ENDPOINT") {
        if !endpoint.trim().is_empty() {
            config.endpoint = endpoint.trim().to_string();
            log::info!("📦 RETRIEVAL_ENDPOINT={}", config.endpoint);
        }
    }

    if let Ok(top_k_str) = std::env::var("RETRIEVAL_TOP_K") {
        if let Ok(top_k) = top_k_str.trim().parse::<usize>() {
            if top_k > 0 {
                config.top_k = top_k;
                log::info!("📦 RETRIEVAL_TOP_K={}", top_k);
            }
        }
    }

    config
}

/// Carrega configuração do pipeline a partir das variáveis de ambiente.
///
/// Variáveis suportadas:
/// - `PIPELINE_MAX_TOOL_ROUNDS`: Rodadas máximas da sessão de retrieval (padrão: 6)
pub fn load_pipeline_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();

    if let Ok(rounds_str) = std::env::var("PIPELINE_MAX_TOOL_ROUNDS") {
        if let Ok(rounds) = rounds_str.trim().parse::<usize>() {
            if rounds > 0 {
                config.max_tool_rounds = rounds;
                log::info!("📦 PIPELINE_MAX_TOOL_ROUNDS={}", rounds);
            }
        }
    }

    config
}
