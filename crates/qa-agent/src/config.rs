//! Configuration for the QA agent
//!
//! Defaults can be overridden by an optional TOML file (`QA_AGENT_CONFIG`)
//! and then by environment variables, which are read from `.env` as well.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Environment variable naming the optional TOML config file
pub const CONFIG_PATH_ENV: &str = "QA_AGENT_CONFIG";

/// Main QA agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// LLM configuration
    pub llm: LlmConfig,
    /// Vector store persistence
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Soft upper bound on chunk length in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters (accepted but not applied by the packer)
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Embedding configuration (served by Ollama)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Ollama embedding model (all-minilm is all-MiniLM-L6-v2)
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "all-minilm".to_string(),
            dimensions: 384,
        }
    }
}

/// Which hosted model backend answers generation requests
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// Groq chat completions API
    #[default]
    Groq,
    /// Local Ollama server
    Ollama,
}

impl FromStr for LlmBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "ollama" => Ok(Self::Ollama),
            other => Err(Error::Config(format!("Unknown LLM provider: {}", other))),
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend used for generation
    pub provider: LlmBackend,
    /// Groq API key
    #[serde(skip_serializing)]
    pub groq_api_key: String,
    /// Groq model name
    pub groq_model: String,
    /// Groq OpenAI-compatible base URL
    pub groq_base_url: String,
    /// Ollama generation model
    pub ollama_model: String,
    /// Ollama base URL (also used for embeddings)
    pub ollama_base_url: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum completion tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmBackend::Groq,
            groq_api_key: String::new(),
            groq_model: "llama-3.1-70b-versatile".to_string(),
            groq_base_url: "https://api.groq.com/openai/v1".to_string(),
            ollama_model: "llama3.1".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            temperature: 0.3,
            max_tokens: 4096,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Vector store persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the persisted collection
    pub data_dir: PathBuf,
    /// Collection name (file stem of the persisted collection)
    pub collection_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
            .join("qa-agent");

        Self {
            data_dir,
            collection_name: "qa_knowledge_base".to_string(),
        }
    }
}

impl StorageConfig {
    /// Path of the persisted collection file
    pub fn collection_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.collection_name))
    }
}

impl QaConfig {
    /// Load configuration: defaults, then `QA_AGENT_CONFIG` TOML file, then environment
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    ///
    /// An unknown `LLM_PROVIDER` is an error; malformed numbers are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("LLM_PROVIDER") {
            self.llm.provider = v.parse()?;
        }
        if let Some(v) = get("GROQ_API_KEY") {
            self.llm.groq_api_key = v;
        }
        if let Some(v) = get("GROQ_MODEL") {
            self.llm.groq_model = v;
        }
        if let Some(v) = get("GROQ_BASE_URL") {
            self.llm.groq_base_url = v;
        }
        if let Some(v) = get("OLLAMA_MODEL") {
            self.llm.ollama_model = v;
        }
        if let Some(v) = get("OLLAMA_BASE_URL") {
            self.llm.ollama_base_url = v;
        }
        if let Some(v) = get("EMBEDDING_MODEL") {
            self.embeddings.model = v;
        }
        if let Some(v) = get("QA_AGENT_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("HOST") {
            self.server.host = v;
        }

        parse_into(get("EMBEDDING_DIMENSIONS"), "EMBEDDING_DIMENSIONS", &mut self.embeddings.dimensions);
        parse_into(get("PORT"), "PORT", &mut self.server.port);
        parse_into(get("CHUNK_SIZE"), "CHUNK_SIZE", &mut self.chunking.chunk_size);
        parse_into(get("CHUNK_OVERLAP"), "CHUNK_OVERLAP", &mut self.chunking.chunk_overlap);
        Ok(())
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be positive".to_string()));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embedding dimensions must be positive".to_string()));
        }
        if self.storage.collection_name.trim().is_empty() {
            return Err(Error::Config("collection_name must not be empty".to_string()));
        }
        Ok(())
    }
}

fn parse_into<T: FromStr>(value: Option<String>, key: &str, target: &mut T) {
    if let Some(raw) = value {
        match raw.trim().parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!("Ignoring {}: '{}' is not a valid value", key, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = QaConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.llm.provider, LlmBackend::Groq);
        assert_eq!(config.storage.collection_name, "qa_knowledge_base");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = QaConfig::default();
        config.apply_overrides(lookup(&[
            ("LLM_PROVIDER", "ollama"),
            ("OLLAMA_MODEL", "llama3.2:3b"),
            ("PORT", "9001"),
            ("CHUNK_SIZE", "500"),
            ("GROQ_API_KEY", ""),
        ]))
        .unwrap();

        assert_eq!(config.llm.provider, LlmBackend::Ollama);
        assert_eq!(config.llm.ollama_model, "llama3.2:3b");
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.chunking.chunk_size, 500);
        assert!(config.llm.groq_api_key.is_empty());
    }

    #[test]
    fn test_invalid_override_is_ignored() {
        let mut config = QaConfig::default();
        config
            .apply_overrides(lookup(&[("PORT", "not-a-port"), ("CHUNK_SIZE", "-5")]))
            .unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.chunking.chunk_size, 1000);
    }

    #[test]
    fn test_unknown_provider() {
        let err = "openai".parse::<LlmBackend>().unwrap_err();
        assert!(err.to_string().contains("Unknown LLM provider: openai"));

        let mut config = QaConfig::default();
        let result = config.apply_overrides(lookup(&[("LLM_PROVIDER", "openai")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_toml() {
        let config: QaConfig = toml::from_str(
            r#"
            [chunking]
            chunk_size = 256

            [llm]
            provider = "ollama"
            "#,
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 256);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.llm.provider, LlmBackend::Ollama);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_validate_rejects_zero_chunk_size() {
        let mut config = QaConfig::default();
        config.chunking.chunk_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
