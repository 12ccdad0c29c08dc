//! Server configuration.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use folio_ext_llama::{LlamaParseClient, LlamaParseConfig, SampleDocumentParser, DEFAULT_BASE_URL};
use folio_extract::ExtractionConfig;
use folio_traits::{DocumentParser, IngestionError};

/// Errors raised while loading configuration or building the parser.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`ServerConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configured parser could not be built.
    #[error("parser setup failed: {0}")]
    Parser(#[from] IngestionError),
}

/// Which document parser the server uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserProvider {
    /// LlamaParse upload API.
    #[default]
    Llama,
    /// Fixed offline statement.
    Sample,
}

/// Document parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Parser backend
    #[serde(default)]
    pub provider: ParserProvider,

    /// LlamaParse endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Credential. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,

    /// Environment variable holding the credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds. Absent means no timeout.
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "LLAMA_CLOUD_API_KEY".to_string()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            provider: ParserProvider::default(),
            base_url: default_base_url(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: None,
        }
    }
}

impl ParserConfig {
    /// The credential from the config file or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
    }

    /// Build the configured parser.
    ///
    /// A LlamaParse provider without a credential is a configuration error.
    pub fn build(&self) -> Result<Arc<dyn DocumentParser>, IngestionError> {
        match self.provider {
            ParserProvider::Sample => {
                warn!("Using the sample parser; uploaded documents are not read");
                Ok(Arc::new(SampleDocumentParser::new()))
            }
            ParserProvider::Llama => {
                let api_key = self.resolve_api_key().ok_or_else(|| {
                    IngestionError::Configuration(format!(
                        "no LlamaParse API key in config or ${}",
                        self.api_key_env
                    ))
                })?;
                let mut config = LlamaParseConfig::new(api_key).with_base_url(&self.base_url);
                if let Some(secs) = self.timeout_secs {
                    config = config.with_timeout(Duration::from_secs(secs));
                }
                info!("Using LlamaParse at {}", self.base_url);
                Ok(Arc::new(LlamaParseClient::new(config)?))
            }
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Document parser
    #[serde(default)]
    pub parser: ParserConfig,

    /// Extraction and aggregation policies
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            parser: ParserConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
