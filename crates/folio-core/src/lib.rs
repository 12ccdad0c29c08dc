//! # Folio Core
//!
//! Core types for the Folio portfolio statement extraction pipeline.
//!
//! A portfolio statement travels through three stages:
//!
//! 1. an ingestion adapter turns PDF bytes into [`ContentFragment`]s,
//! 2. an extractor classifies each fragment by its [`FragmentKind`] and pulls
//!    typed values out of its text,
//! 3. an aggregator merges the results into one [`PortfolioSnapshot`].
//!
//! This crate holds the types shared by all three stages and the
//! [`FolioError`] type raised by the extraction stages.
//!
//! ## Module Overview
//!
//! - [`fragment`] - Parsed document fragments and their classification tag
//! - [`snapshot`] - Portfolio records and the aggregate snapshot
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fragment;
pub mod snapshot;

pub use error::{FolioError, FolioResult};
pub use fragment::{ContentFragment, FragmentKind, FragmentMetadata};
pub use snapshot::{
    Holding, PerformancePoint, PortfolioSnapshot, RiskMetrics, SectorAllocation, YearMonth,
};
