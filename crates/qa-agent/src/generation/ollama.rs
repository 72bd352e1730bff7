//! Ollama HTTP client with retry logic

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::providers::retry::retry_request;

/// Ollama API client with automatic retry
#[derive(Debug, Clone)]
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Server root, without trailing slash
    base_url: String,
    /// Model used for `/api/embeddings`
    embed_model: String,
    /// Model used for `/api/generate`
    generate_model: String,
    temperature: f32,
    /// Maximum retries
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client with retry support
    pub fn new(config: &QaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.llm.ollama_base_url.trim_end_matches('/').to_string(),
            embed_model: config.embeddings.model.clone(),
            generate_model: config.llm.ollama_model.clone(),
            temperature: config.llm.temperature,
            max_retries: config.llm.max_retries,
        })
    }

    /// Model used for generation
    pub fn generate_model(&self) -> &str {
        &self.generate_model
    }

    /// Model used for embeddings
    pub fn embed_model(&self) -> &str {
        &self.embed_model
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding using Ollama with retry
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        retry_request(self.max_retries, || {
            let request = EmbedRequest {
                model: self.embed_model.clone(),
                prompt: text.to_string(),
            };
            let url = url.as_str();

            async move {
                let response = self
                    .client
                    .post(url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(Error::embedding(format!(
                        "Embedding failed: HTTP {}",
                        response.status()
                    )));
                }

                let embed_response: EmbedResponse = response.json().await.map_err(|e| {
                    Error::embedding(format!("Failed to parse embedding response: {}", e))
                })?;

                Ok(embed_response.embedding)
            }
        })
        .await
    }

    /// Complete a prompt with retry logic
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        tracing::info!("Generating with Ollama model: {}", self.generate_model);

        retry_request(self.max_retries, || {
            let request = GenerateRequest {
                model: self.generate_model.clone(),
                prompt: prompt.to_string(),
                stream: false,
                options: GenerateOptions {
                    temperature: self.temperature,
                },
            };
            let url = url.as_str();

            async move {
                let response = self
                    .client
                    .post(url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::llm(format!(
                        "Generation failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let generate_response: GenerateResponse = response.json().await.map_err(|e| {
                    Error::llm(format!("Failed to parse generation response: {}", e))
                })?;

                Ok(generate_response.response)
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_from_config() {
        let mut config = QaConfig::default();
        config.llm.ollama_base_url = "http://ollama:11434/".to_string();
        let client = OllamaClient::new(&config).unwrap();

        assert_eq!(client.base_url, "http://ollama:11434");
        assert_eq!(client.generate_model(), "llama3.1");
        assert_eq!(client.embed_model(), "all-minilm");
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let mut config = QaConfig::default();
        config.llm.ollama_base_url = "http://127.0.0.1:1".to_string();
        let client = OllamaClient::new(&config).unwrap();
        assert!(!client.health_check().await.unwrap());
    }
}
