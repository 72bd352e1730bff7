//! QA agent server binary
//!
//! Run with: cargo run -p qa-agent --bin qa-agent-server

use qa_agent::{config::LlmBackend, server::QaServer, QaConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qa_agent=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                        QA Agent                           ║
║      Grounded Test Cases and Selenium Script Generation   ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let config = QaConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM provider: {:?}", config.llm.provider);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Data dir: {}", config.storage.data_dir.display());

    // Embeddings always come from Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.ollama_base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.ollama_base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.ollama_base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!("  2. Pull models: ollama pull {}", config.embeddings.model);
            if config.llm.provider == LlmBackend::Ollama {
                tracing::warn!("  3. Pull LLM: ollama pull {}", config.llm.ollama_model);
            }
        }
    }

    let server = QaServer::new(config).await?;

    if let Some(llm) = server.state().llm() {
        match llm.health_check().await {
            Ok(true) => tracing::info!("LLM '{}' is reachable", llm.name()),
            _ => tracing::warn!("LLM '{}' did not answer its health check", llm.name()),
        }
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/upload/documents       - Upload support documents");
    println!("  POST /api/upload/html            - Upload the target page");
    println!("  POST /api/generate/test-cases    - Generate test cases");
    println!("  POST /api/generate/selenium-script - Generate a Selenium script");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
