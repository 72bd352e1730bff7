//! Groq chat completions provider (OpenAI-compatible API)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::QaConfig;
use crate::error::{Error, Result};

use super::llm::LlmProvider;
use super::retry::retry_request;

/// Groq cloud LLM
pub struct GroqLlm {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: u32,
}

impl GroqLlm {
    /// Create a Groq provider; fails when no API key is configured
    pub fn new(config: &QaConfig) -> Result<Self> {
        let llm = &config.llm;
        if llm.groq_api_key.trim().is_empty() {
            return Err(Error::Config(
                "GROQ_API_KEY is not set. Please add it to your .env file.".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Groq client initialized with model: {}", llm.groq_model);

        Ok(Self {
            client,
            api_key: llm.groq_api_key.clone(),
            model: llm.groq_model.clone(),
            base_url: llm.groq_base_url.trim_end_matches('/').to_string(),
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            max_retries: llm.max_retries,
        })
    }

    fn request_body(&self, prompt: &str, system_prompt: Option<&str>) -> serde_json::Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": prompt}));

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqLlm {
    async fn generate(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(prompt, system_prompt);

        tracing::debug!("Groq request to {}", url);

        retry_request(self.max_retries, || {
            let url = url.as_str();
            let body = &body;

            async move {
                let response = self
                    .client
                    .post(url)
                    .bearer_auth(&self.api_key)
                    .json(body)
                    .send()
                    .await
                    .map_err(|e| Error::llm(format!("Groq request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::llm(format!("Groq API error: HTTP {} - {}", status, body)));
                }

                let resp: serde_json::Value = response
                    .json()
                    .await
                    .map_err(|e| Error::llm(format!("Failed to parse Groq response: {}", e)))?;

                resp["choices"][0]["message"]["content"]
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::llm("missing choices[0].message.content"))
            }
        })
        .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);
        match self.client.get(&url).bearer_auth(&self.api_key).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
