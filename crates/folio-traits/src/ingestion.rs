//! Document ingestion traits.
//!
//! A [`DocumentParser`] delegates raw document bytes to a parsing provider and
//! returns the provider's fragments unchanged. It performs no classification;
//! that is the extractor's job.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::IngestionError;
use folio_core::ContentFragment;

/// Kind of parser behind the trait object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// Network call to an external parsing service.
    Remote,
    /// Fixed local output, no network.
    Sample,
}

/// Turns document bytes into content fragments.
///
/// Implementations must be stateless per call: configuration and credentials
/// are fixed at construction and only read afterwards.
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parser kind.
    fn kind(&self) -> ParserKind;

    /// Short name for logs.
    fn name(&self) -> &str;

    /// Parse one document.
    ///
    /// One invocation performs at most one outbound request and never retries.
    async fn parse(&self, document: Bytes) -> Result<Vec<ContentFragment>, IngestionError>;
}
