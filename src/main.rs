// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// AGENTIC RAG CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// CLI para execução do pipeline de question-answering multi-agente.
//
// Uso:
//   agentic-rag-cli "What are the trade-offs between HNSW and IVF indexes?"
//   agentic-rag-cli --server --port 8080   (modo servidor HTTP, feature `server`)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use agentic_rag::llm::OpenAiClient;
use agentic_rag::prelude::*;
use agentic_rag::retrieval::HttpRetrievalClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Tenta carregar o arquivo .env de múltiplos locais possíveis
fn load_dotenv() {
    // Lista de possíveis locais para o .env
    let possible_paths = [
        // Diretório atual
        PathBuf::from(".env"),
        // Diretório pai (se executando de um subdiretório)
        PathBuf::from("../.env"),
        // Caminho absoluto em tempo de compilação (fallback)
        {
            let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            p.push(".env");
            p
        },
    ];

    for path in &possible_paths {
        if path.exists() {
            match dotenvy::from_path(path) {
                Ok(_) => {
                    eprintln!(
                        "✓ Carregado .env de: {:?}",
                        path.canonicalize().unwrap_or(path.clone())
                    );
                    return;
                }
                Err(e) => {
                    eprintln!("⚠ Erro ao carregar {:?}: {}", path, e);
                }
            }
        }
    }

    // Última tentativa: dotenvy padrão
    if dotenvy::dotenv().is_ok() {
        eprintln!("✓ Carregado .env do diretório atual");
    } else {
        eprintln!(
            "⚠ Nenhum arquivo .env encontrado. Certifique-se de que OPENAI_API_KEY está definida."
        );
    }
}

/// Lê a API key da OpenAI ou aborta com instruções
fn require_openai_key() -> String {
    std::env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
        eprintln!("✗ Erro: OPENAI_API_KEY não encontrada!");
        eprintln!();
        eprintln!("Certifique-se de que:");
        eprintln!("  1. O arquivo .env existe no diretório raiz do projeto");
        eprintln!("  2. O arquivo contém: OPENAI_API_KEY=sua-chave-aqui");
        eprintln!();
        eprintln!("Ou defina a variável de ambiente diretamente:");
        eprintln!("  export OPENAI_API_KEY=sua-chave-aqui");
        std::process::exit(1);
    })
}

/// Extrai a porta dos argumentos (`--port 3000` ou `--port=3000`)
fn parse_port(args: &[String]) -> u16 {
    for (i, arg) in args.iter().enumerate() {
        if arg == "--port" {
            if let Some(port) = args.get(i + 1).and_then(|p| p.parse().ok()) {
                return port;
            }
        }
        if let Some(value) = arg.strip_prefix("--port=") {
            if let Ok(port) = value.parse() {
                return port;
            }
        }
    }
    8080
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar .env PRIMEIRO, antes de qualquer coisa
    load_dotenv();

    // Inicializar logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse argumentos
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Agentic RAG CLI v{}", agentic_rag::VERSION);
        eprintln!();
        eprintln!("Uso: {} <pergunta>", args[0]);
        eprintln!();
        eprintln!("Opções:");
        eprintln!("  --server           Modo servidor HTTP (requer feature `server`)");
        eprintln!("  --port <n>         Porta do servidor (padrão: 8080)");
        eprintln!();
        eprintln!("Exemplos:");
        eprintln!(
            "  {} \"How does quantization affect recall in vector search?\"",
            args[0]
        );
        eprintln!("  {} --server --port 3000", args[0]);
        std::process::exit(1);
    }

    // Modo servidor
    if args[1] == "--server" {
        return run_server_mode(parse_port(&args)).await;
    }

    let question = args[1..].join(" ");

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" AGENTIC RAG v{}", agentic_rag::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Pergunta: {}", question);
    println!();

    // Criar clientes reais com API keys de variáveis de ambiente
    let openai_key = require_openai_key();
    let retrieval_key = std::env::var("RETRIEVAL_API_KEY").ok();

    let llm_config = agentic_rag::load_llm_config();
    let retrieval_config = agentic_rag::load_retrieval_config();
    let pipeline_config = agentic_rag::load_pipeline_config();

    let llm_client: Arc<dyn LlmClient> = Arc::new(OpenAiClient::from_config(openai_key, &llm_config));
    let retrieval_client: Arc<dyn RetrievalClient> =
        Arc::new(HttpRetrievalClient::from_config(&retrieval_config, retrieval_key));

    // Criar e executar pipeline
    let pipeline = RagPipeline::new(llm_client, retrieval_client, pipeline_config);

    println!("Iniciando pipeline...");
    println!();

    let result = pipeline.run(&question).await;

    // Exibir resultado
    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(" RESULTADO");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    match result {
        Ok(state) => {
            println!("✓ Pipeline concluído com sucesso!");
            println!();

            if let Some(plan) = &state.plan {
                if !plan.is_empty() {
                    println!("Plano:");
                    println!("{}", plan);
                    println!();
                }
            }

            if let Some(subs) = &state.sub_questions {
                if !subs.is_empty() {
                    println!("Sub-questions:");
                    for (i, sq) in subs.iter().enumerate() {
                        println!("  {}. {}", i + 1, sq);
                    }
                    println!();
                }
            }

            if let Some(context) = &state.context {
                println!("Contexto recuperado: {} caracteres", context.len());
                println!();
            }

            if let Some(answer) = &state.answer {
                println!("Resposta:");
                println!("{}", answer);
                println!();
            }
        }
        Err(e) => {
            println!("✗ Pipeline falhou");
            println!("Erro: {}", e);
            println!();
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Sobe o servidor HTTP na porta indicada (feature `server`).
#[cfg(feature = "server")]
async fn run_server_mode(port: u16) -> anyhow::Result<()> {
    use agentic_rag::server::{start_server, AppState};
    use std::net::SocketAddr;

    let openai_key = require_openai_key();
    let retrieval_key = std::env::var("RETRIEVAL_API_KEY").ok();
    let secret = std::env::var("API_SECRET").ok();

    let state = Arc::new(AppState {
        llm_config: agentic_rag::load_llm_config(),
        retrieval_config: agentic_rag::load_retrieval_config(),
        pipeline_config: agentic_rag::load_pipeline_config(),
        openai_key,
        retrieval_key,
        secret,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("🚀 Servidor iniciando em http://{}", addr);

    start_server(addr, state).await
}

#[cfg(not(feature = "server"))]
async fn run_server_mode(_port: u16) -> anyhow::Result<()> {
    eprintln!("✗ Modo servidor não disponível neste binário.");
    eprintln!();
    eprintln!("Recompile com a feature habilitada:");
    eprintln!("  cargo build --features server");
    std::process::exit(1);
}
