//! Configuration for extraction and aggregation.

use serde::{Deserialize, Serialize};

/// How a missing or unparseable field is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// The first failing field aborts the whole document.
    Strict,

    /// Failing fields are recorded and left at their defaults.
    #[default]
    Lenient,
}

/// What to do when a document carries more than one risk metrics fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskMetricsPolicy {
    /// The later fragment replaces the earlier one wholesale.
    #[default]
    LastWins,

    /// A second fragment fails the document.
    Reject,
}

/// How sector entries from several fragments are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorPolicy {
    /// Every entry is appended, duplicates included.
    #[default]
    Append,

    /// Entries with the same name (case-insensitive) are summed, in
    /// first-seen order.
    MergeByName,
}

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Field failure handling.
    pub mode: ExtractionMode,

    /// Duplicate risk metrics handling.
    pub risk_metrics: RiskMetricsPolicy,

    /// Duplicate sector handling.
    pub sectors: SectorPolicy,
}

impl ExtractionConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that aborts on the first failing field.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            mode: ExtractionMode::Strict,
            ..Self::default()
        }
    }

    /// Sets the extraction mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ExtractionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the risk metrics policy.
    #[must_use]
    pub fn with_risk_metrics(mut self, policy: RiskMetricsPolicy) -> Self {
        self.risk_metrics = policy;
        self
    }

    /// Sets the sector policy.
    #[must_use]
    pub fn with_sectors(mut self, policy: SectorPolicy) -> Self {
        self.sectors = policy;
        self
    }
}
