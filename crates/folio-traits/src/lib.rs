//! # Folio Traits
//!
//! Trait definitions for the Folio extraction pipeline.
//!
//! This crate contains ONLY trait definitions with ZERO runtime dependencies.
//! Implementations live in extension crates (`folio-ext-llama`).
//!
//! ## Module Structure
//!
//! - [`ingestion`]: Document parsers that turn raw bytes into fragments
//! - [`error`]: Errors raised by ingestion
//!
//! ## Dependency Injection
//!
//! The server holds a parser behind `Arc<dyn DocumentParser>`:
//!
//! ```ignore
//! let parser: Arc<dyn DocumentParser> = Arc::new(LlamaParseClient::new(config)?);
//! let fragments = parser.parse(bytes).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ingestion;

// Re-export commonly used types
pub use error::IngestionError;
pub use ingestion::{DocumentParser, ParserKind};
