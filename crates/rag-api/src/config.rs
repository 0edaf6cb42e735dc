//! Configuration for the RAG API

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagApiConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Memory service (gateway) connection
    pub memory: MemoryConfig,
    /// Ingestion behaviour
    pub ingestion: IngestionConfig,
    /// Backing services of the memory service, passed through as-is
    pub backend: BackendConfig,
}

impl RagApiConfig {
    /// Load configuration from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&raw)?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply overrides from environment-style lookups
    ///
    /// Unparsable numeric values are ignored with a warning.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("RAG_API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RAG_API_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid RAG_API_PORT: {}", port),
            }
        }
        if let Some(url) = lookup("MEMORY_SERVICE_URL") {
            self.memory.service_url = url;
        }
        if let Some(key) = lookup("MEMORY_API_KEY") {
            self.memory.api_key = Some(key);
        }
        if let Some(host) = lookup("QDRANT_HOST") {
            self.backend.qdrant.host = host;
        }
        if let Some(url) = lookup("OLLAMA_SERVICE_URL") {
            self.backend.ollama.service_url = url;
        }
        if let Some(model) = lookup("OLLAMA_MODEL") {
            self.backend.ollama.model = model;
        }
        if let Some(model) = lookup("OLLAMA_EMBEDDING_MODEL") {
            self.backend.ollama.embedding_model = model;
        }
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.memory.service_url.trim().is_empty() {
            return Err(Error::Config("memory.service_url must not be empty".to_string()));
        }
        if self.server.port == 0 {
            return Err(Error::Config("server.port must be non-zero".to_string()));
        }
        if self.server.max_upload_size == 0 {
            return Err(Error::Config("server.max_upload_size must be non-zero".to_string()));
        }
        if self.memory.max_concurrent_requests == 0 {
            return Err(Error::Config(
                "memory.max_concurrent_requests must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
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
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Connection to the Kernel Memory compatible service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Base URL of the memory service
    pub service_url: String,
    /// API key sent in the `Authorization` header
    pub api_key: Option<String>,
    /// Index to import into and query (service default when unset)
    pub index: Option<String>,
    /// Minimum relevance for sources used in answers
    pub min_relevance: Option<f64>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Largest document accepted for import, in bytes
    pub max_document_size: usize,
    /// Maximum in-flight requests to the memory service
    pub max_concurrent_requests: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:9001".to_string(),
            api_key: None,
            index: None,
            min_relevance: None,
            timeout_secs: 120, // embedding + search + generation
            max_document_size: 100 * 1024 * 1024,
            max_concurrent_requests: 16,
        }
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Delay before the diagnostic readiness probe of an imported document.
    /// Disabled when unset.
    pub readiness_check_delay_secs: Option<u64>,
}

/// Services behind the memory service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Vector database
    pub qdrant: QdrantConfig,
    /// Text generation and embedding backend
    pub ollama: OllamaConfig,
    /// Where the memory service keeps raw document bytes
    pub storage_dir: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            qdrant: QdrantConfig::default(),
            ollama: OllamaConfig::default(),
            storage_dir: PathBuf::from("/app/data"),
        }
    }
}

/// Qdrant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QdrantConfig {
    /// Qdrant endpoint
    pub host: String,
    /// Qdrant API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost:6333".to_string(),
            api_key: None,
        }
    }
}

/// Ollama configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// Ollama base URL
    pub service_url: String,
    /// Generation model name
    pub model: String,
    /// Embedding model name
    pub embedding_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = RagApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.ollama.embedding_model, "nomic-embed-text");
        assert!(config.ingestion.readiness_check_delay_secs.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagApiConfig::from_toml(
            r#"
            [server]
            port = 5000

            [memory]
            service_url = "http://km:9001"
            min_relevance = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.memory.service_url, "http://km:9001");
        assert_eq!(config.memory.min_relevance, Some(0.5));
        assert_eq!(config.memory.max_concurrent_requests, 16);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("RAG_API_PORT", "9090"),
            ("MEMORY_SERVICE_URL", "http://memory:9001"),
            ("QDRANT_HOST", "http://qdrant:6333"),
            ("OLLAMA_MODEL", "phi3"),
        ]
        .into_iter()
        .collect();

        let mut config = RagApiConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.memory.service_url, "http://memory:9001");
        assert_eq!(config.backend.qdrant.host, "http://qdrant:6333");
        assert_eq!(config.backend.ollama.model, "phi3");
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = RagApiConfig::default();
        config.apply_env_overrides(|key| (key == "RAG_API_PORT").then(|| "http".to_string()));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_validate_rejects_empty_service_url() {
        let mut config = RagApiConfig::default();
        config.memory.service_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            RagApiConfig::from_toml("[server]\nport = \"abc\""),
            Err(Error::Config(_))
        ));
    }
}
