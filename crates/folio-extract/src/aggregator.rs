//! Merge of extracted sub-records into one snapshot.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use folio_core::{FolioError, FolioResult, PerformancePoint, PortfolioSnapshot, YearMonth};

use crate::config::{ExtractionConfig, RiskMetricsPolicy, SectorPolicy};
use crate::extractor::{ExtractedRecord, SubRecord};

/// Folds sub-records into a [`PortfolioSnapshot`].
///
/// The snapshot starts from its default (zeros and empty sequences), so a
/// category absent from the document stays at its default. Performance
/// history is returned ascending by month, one point per month; a repeated
/// month keeps the value seen last.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    risk_metrics: RiskMetricsPolicy,
    sectors: SectorPolicy,
}

impl Aggregator {
    /// Create an aggregator from the pipeline config.
    #[must_use]
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            risk_metrics: config.risk_metrics,
            sectors: config.sectors,
        }
    }

    /// Aggregate records, in order.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::ConflictingRiskMetrics`] under
    /// [`RiskMetricsPolicy::Reject`] when two risk metrics records are present.
    pub fn aggregate(&self, records: &[ExtractedRecord]) -> FolioResult<PortfolioSnapshot> {
        let mut snapshot = PortfolioSnapshot::default();
        let mut risk_source: Option<usize> = None;
        let mut performance: BTreeMap<YearMonth, Decimal> = BTreeMap::new();

        for extracted in records {
            match &extracted.record {
                SubRecord::Summary {
                    total_value,
                    risk_score,
                } => {
                    if let Some(value) = total_value {
                        snapshot.total_value = *value;
                    }
                    if let Some(score) = risk_score {
                        snapshot.risk_score = *score;
                    }
                }
                SubRecord::Sectors(sectors) => match self.sectors {
                    SectorPolicy::Append => snapshot.sectors.extend(sectors.iter().cloned()),
                    SectorPolicy::MergeByName => {
                        for sector in sectors {
                            match snapshot
                                .sectors
                                .iter_mut()
                                .find(|s| s.name.eq_ignore_ascii_case(&sector.name))
                            {
                                Some(existing) => existing.value += sector.value,
                                None => snapshot.sectors.push(sector.clone()),
                            }
                        }
                    }
                },
                SubRecord::Holding(holding) => snapshot.holdings.push(holding.clone()),
                SubRecord::RiskMetrics(metrics) => {
                    if let Some(first) = risk_source {
                        match self.risk_metrics {
                            RiskMetricsPolicy::Reject => {
                                return Err(FolioError::ConflictingRiskMetrics {
                                    first,
                                    second: extracted.fragment,
                                });
                            }
                            RiskMetricsPolicy::LastWins => warn!(
                                replaced = first,
                                by = extracted.fragment,
                                "Risk metrics replaced by a later fragment"
                            ),
                        }
                    }
                    snapshot.risk_metrics = *metrics;
                    risk_source = Some(extracted.fragment);
                }
                SubRecord::Performance(points) => {
                    for point in points {
                        performance.insert(point.date, point.value);
                    }
                }
            }
        }

        snapshot.historical_performance = performance
            .into_iter()
            .map(|(date, value)| PerformancePoint::new(date, value))
            .collect();

        Ok(snapshot)
    }
}

/// Aggregate records with the given config.
///
/// # Errors
///
/// See [`Aggregator::aggregate`].
pub fn aggregate(
    records: &[ExtractedRecord],
    config: &ExtractionConfig,
) -> FolioResult<PortfolioSnapshot> {
    Aggregator::new(config).aggregate(records)
}
