//! # Folio Extract
//!
//! Turns parsed statement fragments into a
//! [`PortfolioSnapshot`](folio_core::PortfolioSnapshot).
//!
//! ## Design Philosophy
//!
//! - **Closed classification**: fragments are routed by
//!   [`FragmentKind`](folio_core::FragmentKind), never
//!   by string comparison at call sites
//! - **Per-field results**: every field extractor returns a `Result`, so a
//!   missing label can either abort the document ([`ExtractionMode::Strict`])
//!   or be recorded and skipped ([`ExtractionMode::Lenient`])
//! - **Explicit merge policies**: duplicate risk metrics and sectors follow
//!   [`RiskMetricsPolicy`] and [`SectorPolicy`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use folio_extract::prelude::*;
//!
//! let fragments = vec![
//!     ContentFragment::new("portfolio_summary", "Total Value: $1,000,000 Risk Score: 65"),
//!     ContentFragment::new("risk_metrics", "Beta: 1.25 Alpha: 5.00%"),
//! ];
//!
//! let report = Pipeline::new(ExtractionConfig::default()).run(&fragments)?;
//! assert_eq!(report.snapshot.risk_metrics.beta, 1.25);
//! ```
//!
//! ## Module Overview
//!
//! - [`patterns`] - Field labels and value parsers
//! - [`extractor`] - Per-tag extraction into sub-records
//! - [`aggregator`] - Merge of sub-records into a snapshot
//! - [`pipeline`] - Extraction followed by aggregation
//! - [`analytics`] - Weighted exposures, what-if reweighting, recommendations
//! - [`qa`] - Question answering over a snapshot

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod analytics;
pub mod config;
pub mod extractor;
pub mod patterns;
pub mod pipeline;
pub mod qa;
pub mod report;

pub use aggregator::{aggregate, Aggregator};
pub use analytics::{
    recommendations, weight_sum, weighted_alpha, weighted_beta, what_if, AnalyticsError,
    Exposure, WhatIfResult,
};
pub use config::{ExtractionConfig, ExtractionMode, RiskMetricsPolicy, SectorPolicy};
pub use extractor::{extract, ExtractedRecord, ExtractionOutcome, Extractor, SubRecord};
pub use pipeline::Pipeline;
pub use qa::answer_question;
pub use report::{ExtractionReport, FieldFailure};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        aggregate, extract, ExtractionConfig, ExtractionMode, ExtractionReport, FieldFailure,
        Pipeline, RiskMetricsPolicy, SectorPolicy,
    };
    pub use folio_core::{
        ContentFragment, FolioError, FolioResult, FragmentKind, Holding, PerformancePoint,
        PortfolioSnapshot, RiskMetrics, SectorAllocation, YearMonth,
    };
}
