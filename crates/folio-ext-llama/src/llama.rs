//! LlamaParse API client.
//!
//! One upload per document: the bytes are posted as a multipart `file` field
//! and the response body is decoded as an array of `{ text, metadata }`
//! fragments. No retries. No timeout unless one is configured.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use folio_core::ContentFragment;
use folio_traits::error::IngestionError;
use folio_traits::ingestion::{DocumentParser, ParserKind};

/// Default LlamaParse endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.cloud.llamaindex.ai";

const UPLOAD_PATH: &str = "/api/parsing/upload";

// Longest body excerpt carried in a status error.
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for [`LlamaParseClient`].
#[derive(Clone)]
pub struct LlamaParseConfig {
    /// Scheme and host, without trailing slash.
    pub base_url: String,
    /// Bearer credential.
    pub api_key: String,
    /// Whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl LlamaParseConfig {
    /// Settings for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    /// Use a different endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bound each request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl std::fmt::Debug for LlamaParseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlamaParseConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Document parser backed by the LlamaParse upload API.
#[derive(Debug, Clone)]
pub struct LlamaParseClient {
    client: reqwest::Client,
    upload_url: String,
}

impl LlamaParseClient {
    /// Build a client. The credential is fixed for the client's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`IngestionError::Configuration`] for an empty or non-ASCII key
    /// or when the HTTP client cannot be built.
    pub fn new(config: LlamaParseConfig) -> Result<Self, IngestionError> {
        if config.api_key.trim().is_empty() {
            return Err(IngestionError::Configuration(
                "LlamaParse API key is empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key.trim()))
            .map_err(|e| IngestionError::Configuration(format!("Invalid API key format: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            IngestionError::Configuration(format!("Failed to create HTTP client: {e}"))
        })?;

        Ok(Self {
            client,
            upload_url: format!("{}{}", config.base_url.trim_end_matches('/'), UPLOAD_PATH),
        })
    }

    /// Full upload URL.
    #[must_use]
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

#[async_trait]
impl DocumentParser for LlamaParseClient {
    fn kind(&self) -> ParserKind {
        ParserKind::Remote
    }

    fn name(&self) -> &str {
        "llamaparse"
    }

    async fn parse(&self, document: Bytes) -> Result<Vec<ContentFragment>, IngestionError> {
        if document.is_empty() {
            return Err(IngestionError::EmptyDocument);
        }

        let size = document.len();
        let part = Part::bytes(document.to_vec())
            .file_name("document.pdf")
            .mime_str("application/pdf")
            .map_err(|e| IngestionError::Configuration(e.to_string()))?;
        let form = Form::new().part("file", part);

        info!("Uploading {} bytes to {}", size, self.upload_url);
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| IngestionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IngestionError::Transport(e.to_string()))?;

        if !status.is_success() {
            let mut excerpt = body;
            if excerpt.len() > MAX_ERROR_BODY {
                let mut end = MAX_ERROR_BODY;
                while !excerpt.is_char_boundary(end) {
                    end -= 1;
                }
                excerpt.truncate(end);
            }
            return Err(IngestionError::Status {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        let fragments: Vec<ContentFragment> = serde_json::from_str(&body)
            .map_err(|e| IngestionError::MalformedBody(e.to_string()))?;
        debug!("LlamaParse returned {} fragments", fragments.len());

        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        let err = LlamaParseClient::new(LlamaParseConfig::new("  ")).unwrap_err();
        assert!(matches!(err, IngestionError::Configuration(_)));
    }

    #[test]
    fn test_upload_url() {
        let client = LlamaParseClient::new(
            LlamaParseConfig::new("llx-test").with_base_url("http://localhost:9000/"),
        )
        .unwrap();
        assert_eq!(client.upload_url(), "http://localhost:9000/api/parsing/upload");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = LlamaParseConfig::new("llx-secret");
        assert!(!format!("{config:?}").contains("llx-secret"));
    }
}
