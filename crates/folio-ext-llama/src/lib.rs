//! # Folio Ext Llama
//!
//! Document ingestion adapters for the Folio pipeline.
//!
//! This crate provides two [`DocumentParser`](folio_traits::DocumentParser)
//! implementations:
//! - [`LlamaParseClient`]: uploads the document to the LlamaParse API
//! - [`SampleDocumentParser`]: returns a fixed statement without network access,
//!   for development and tests

#![warn(missing_docs)]
#![warn(clippy::all)]

mod llama;
mod sample;

pub use llama::*;
pub use sample::*;
