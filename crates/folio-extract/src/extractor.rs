//! Fragment classification and field extraction.
//!
//! Each fragment is routed by its [`FragmentKind`] to one extraction rule,
//! which reads the fields for that category and yields at most one
//! [`SubRecord`]. Fragments with any other tag are skipped.
//!
//! Every field read goes through a [`FieldContext`], which applies the
//! configured [`ExtractionMode`]: in strict mode the first failure is returned
//! as an error, in lenient mode it is recorded as a [`FieldFailure`] and the
//! field keeps its default.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use folio_core::{
    ContentFragment, FolioError, FolioResult, FragmentKind, Holding, PerformancePoint,
    RiskMetrics, SectorAllocation, YearMonth,
};

use crate::config::ExtractionMode;
use crate::patterns::{
    scan_performance, scan_sectors, FieldError, FieldPattern, ALPHA, BETA, INFORMATION_RATIO,
    MAX_DRAWDOWN, NAME, RISK_SCORE, SHARPE_RATIO, SYMBOL, TOTAL_VALUE, TREYNOR_RATIO, VALUE, VAR,
    WEIGHT,
};
use crate::report::FieldFailure;

/// A typed record extracted from one fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum SubRecord {
    /// Headline figures; `None` where the field was not extracted.
    Summary {
        /// Total market value.
        total_value: Option<Decimal>,
        /// Risk score.
        risk_score: Option<f64>,
    },
    /// Zero or more sector entries.
    Sectors(Vec<SectorAllocation>),
    /// One position.
    Holding(Holding),
    /// A full risk metrics record.
    RiskMetrics(RiskMetrics),
    /// Zero or more performance points, in text order.
    Performance(Vec<PerformancePoint>),
}

/// A sub-record tagged with the index of the fragment it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    /// Index of the source fragment.
    pub fragment: usize,
    /// The extracted record.
    pub record: SubRecord,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionOutcome {
    /// Records in fragment order.
    pub records: Vec<ExtractedRecord>,
    /// Fields that failed (lenient mode).
    pub failures: Vec<FieldFailure>,
    /// Indices of fragments with an unrecognized tag.
    pub ignored: Vec<usize>,
}

/// Routes fragments to extraction rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor {
    mode: ExtractionMode,
}

impl Extractor {
    /// Create an extractor with the given failure mode.
    #[must_use]
    pub fn new(mode: ExtractionMode) -> Self {
        Self { mode }
    }

    /// Extract sub-records from fragments, in order.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first field failure.
    pub fn extract(&self, fragments: &[ContentFragment]) -> FolioResult<ExtractionOutcome> {
        let mut outcome = ExtractionOutcome::default();

        for (index, fragment) in fragments.iter().enumerate() {
            let kind = fragment.kind();
            let mut ctx = FieldContext {
                fragment: index,
                kind: kind.clone(),
                mode: self.mode,
                failures: &mut outcome.failures,
            };

            let record = match kind {
                FragmentKind::PortfolioSummary => Some(extract_summary(&fragment.text, &mut ctx)?),
                FragmentKind::SectorAllocation => Some(extract_sectors(&fragment.text, &mut ctx)?),
                FragmentKind::Holding => extract_holding(fragment, &mut ctx)?,
                FragmentKind::RiskMetrics => Some(extract_risk_metrics(&fragment.text, &mut ctx)?),
                FragmentKind::HistoricalPerformance => {
                    extract_performance(&fragment.text, &mut ctx)?
                }
                FragmentKind::Unrecognized(ref tag) => {
                    debug!(fragment = index, tag = %tag, "Ignoring unrecognized fragment");
                    outcome.ignored.push(index);
                    None
                }
            };

            if let Some(record) = record {
                outcome.records.push(ExtractedRecord {
                    fragment: index,
                    record,
                });
            }
        }

        debug!(
            fragments = fragments.len(),
            records = outcome.records.len(),
            failures = outcome.failures.len(),
            "Extraction finished"
        );
        Ok(outcome)
    }
}

/// Extract sub-records with the given failure mode.
///
/// # Errors
///
/// In strict mode, returns the first field failure.
pub fn extract(
    fragments: &[ContentFragment],
    mode: ExtractionMode,
) -> FolioResult<ExtractionOutcome> {
    Extractor::new(mode).extract(fragments)
}

// =============================================================================
// FIELD CONTEXT
// =============================================================================

/// Per-fragment state for field reads.
struct FieldContext<'a> {
    fragment: usize,
    kind: FragmentKind,
    mode: ExtractionMode,
    failures: &'a mut Vec<FieldFailure>,
}

impl FieldContext<'_> {
    /// Apply the failure mode to `err`: return it (strict) or record it (lenient).
    fn fail(&mut self, err: FolioError) -> FolioResult<()> {
        match self.mode {
            ExtractionMode::Strict => Err(err),
            ExtractionMode::Lenient => {
                warn!(fragment = self.fragment, kind = %self.kind, "{}", err);
                if let Some(failure) = FieldFailure::from_error(&err) {
                    self.failures.push(failure);
                }
                Ok(())
            }
        }
    }

    fn resolve<T>(&mut self, field: &str, result: Result<T, FieldError>) -> FolioResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(FieldError::Missing) => {
                self.fail(FolioError::field_missing(self.fragment, self.kind.clone(), field))?;
                Ok(None)
            }
            Err(FieldError::Invalid(raw)) => {
                self.fail(FolioError::invalid_value(
                    self.fragment,
                    self.kind.clone(),
                    field,
                    raw,
                ))?;
                Ok(None)
            }
        }
    }

    fn amount(&mut self, pattern: &FieldPattern, text: &str) -> FolioResult<Option<Decimal>> {
        self.resolve(pattern.field(), pattern.amount(text))
    }

    fn number(&mut self, pattern: &FieldPattern, text: &str) -> FolioResult<Option<f64>> {
        self.resolve(pattern.field(), pattern.number(text))
    }

    fn percent(&mut self, pattern: &FieldPattern, text: &str) -> FolioResult<Option<f64>> {
        self.resolve(pattern.field(), pattern.percent(text))
    }

    /// Read a text field, falling back to a metadata value when the label is absent.
    fn text_or(
        &mut self,
        pattern: &FieldPattern,
        text: &str,
        fallback: Option<&str>,
    ) -> FolioResult<Option<String>> {
        let result = match (pattern.text(text), fallback) {
            (Err(FieldError::Missing), Some(value)) if !value.trim().is_empty() => {
                Ok(value.trim().to_string())
            }
            (result, _) => result,
        };
        self.resolve(pattern.field(), result)
    }
}

// =============================================================================
// RULES
// =============================================================================

fn extract_summary(text: &str, ctx: &mut FieldContext<'_>) -> FolioResult<SubRecord> {
    let total_value = ctx.amount(&TOTAL_VALUE, text)?;
    let risk_score = ctx.number(&RISK_SCORE, text)?;
    Ok(SubRecord::Summary {
        total_value,
        risk_score,
    })
}

fn extract_sectors(text: &str, ctx: &mut FieldContext<'_>) -> FolioResult<SubRecord> {
    let mut sectors = Vec::new();
    for (name, value) in scan_sectors(text) {
        if let Some(value) = ctx.resolve("sectors", value)? {
            sectors.push(SectorAllocation::new(name, value));
        }
    }
    Ok(SubRecord::Sectors(sectors))
}

fn extract_holding(
    fragment: &ContentFragment,
    ctx: &mut FieldContext<'_>,
) -> FolioResult<Option<SubRecord>> {
    let text = fragment.text.as_str();
    let metadata = &fragment.metadata;

    let Some(symbol) = ctx.text_or(&SYMBOL, text, metadata.str_field("symbol"))? else {
        return Ok(None);
    };
    let name = ctx
        .text_or(&NAME, text, metadata.str_field("name"))?
        .unwrap_or_else(|| symbol.clone());

    let holding = Holding {
        value: ctx.amount(&VALUE, text)?.unwrap_or_default(),
        weight: ctx.percent(&WEIGHT, text)?.unwrap_or_default(),
        beta: ctx.number(&BETA, text)?.unwrap_or_default(),
        alpha: ctx.percent(&ALPHA, text)?.unwrap_or_default(),
        symbol,
        name,
    };
    Ok(Some(SubRecord::Holding(holding)))
}

fn extract_risk_metrics(text: &str, ctx: &mut FieldContext<'_>) -> FolioResult<SubRecord> {
    let metrics = RiskMetrics {
        alpha: ctx.percent(&ALPHA, text)?.unwrap_or_default(),
        beta: ctx.number(&BETA, text)?.unwrap_or_default(),
        sharpe_ratio: ctx.number(&SHARPE_RATIO, text)?.unwrap_or_default(),
        treynor_ratio: ctx.number(&TREYNOR_RATIO, text)?.unwrap_or_default(),
        information_ratio: ctx.number(&INFORMATION_RATIO, text)?.unwrap_or_default(),
        var: ctx.percent(&VAR, text)?.unwrap_or_default(),
        max_drawdown: ctx.percent(&MAX_DRAWDOWN, text)?.unwrap_or_default(),
    };
    Ok(SubRecord::RiskMetrics(metrics))
}

fn extract_performance(
    text: &str,
    ctx: &mut FieldContext<'_>,
) -> FolioResult<Option<SubRecord>> {
    const FIELD: &str = "historicalPerformance";

    let entries = scan_performance(text);
    if entries.is_empty() {
        ctx.fail(FolioError::field_missing(ctx.fragment, ctx.kind.clone(), FIELD))?;
        return Ok(None);
    }

    let mut points = Vec::with_capacity(entries.len());
    for (period, value) in entries {
        let date = match period.parse::<YearMonth>() {
            Ok(date) => date,
            Err(_) => {
                ctx.fail(FolioError::invalid_value(
                    ctx.fragment,
                    ctx.kind.clone(),
                    FIELD,
                    period,
                ))?;
                continue;
            }
        };
        if let Some(value) = ctx.resolve(FIELD, value)? {
            points.push(PerformancePoint::new(date, value));
        }
    }
    Ok(Some(SubRecord::Performance(points)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn lenient(fragments: &[ContentFragment]) -> ExtractionOutcome {
        extract(fragments, ExtractionMode::Lenient).unwrap()
    }

    #[test]
    fn test_summary() {
        let outcome = lenient(&[ContentFragment::new(
            "portfolio_summary",
            "Total Value: $1,000,000 Risk Score: 65",
        )]);

        assert_eq!(
            outcome.records[0].record,
            SubRecord::Summary {
                total_value: Some(dec!(1000000)),
                risk_score: Some(65.0),
            }
        );
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_strict_aborts_on_missing_field() {
        let fragments = vec![
            ContentFragment::new("portfolio_summary", "Total Value: $5"),
            ContentFragment::new("risk_metrics", "Beta: 1.0"),
        ];
        let err = extract(&fragments, ExtractionMode::Strict).unwrap_err();

        assert_eq!(
            err,
            FolioError::field_missing(0, FragmentKind::PortfolioSummary, "riskScore")
        );
    }

    #[test]
    fn test_lenient_records_and_continues() {
        let fragments = vec![
            ContentFragment::new("portfolio_summary", "Total Value: $5"),
            ContentFragment::new("risk_metrics", "Beta: 1.0"),
        ];
        let outcome = lenient(&fragments);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(
            outcome.records[0].record,
            SubRecord::Summary {
                total_value: Some(dec!(5)),
                risk_score: None,
            }
        );
        // riskScore, then the six absent risk metrics
        assert_eq!(outcome.failures.len(), 7);
        assert_eq!(outcome.failures[0].field, "riskScore");
        assert!(outcome.failures[1..].iter().all(|f| f.fragment == 1));
    }

    #[test]
    fn test_holding_percentages_are_fractions() {
        let outcome = lenient(&[ContentFragment::new(
            "holding",
            "Symbol: AAPL Name: Apple Inc. Value: $150,000 Weight: 15.00% Beta: 1.20 Alpha: 2.50%",
        )]);

        let SubRecord::Holding(holding) = &outcome.records[0].record else {
            panic!("expected holding");
        };
        assert_eq!(holding.symbol, "AAPL");
        assert_eq!(holding.name, "Apple Inc.");
        assert_eq!(holding.value, dec!(150000));
        assert_relative_eq!(holding.weight, 0.15);
        assert_relative_eq!(holding.beta, 1.20);
        assert_relative_eq!(holding.alpha, 0.025);
    }

    #[test]
    fn test_holding_symbol_from_metadata() {
        let fragment = ContentFragment::new("holding", "Value: $10 Weight: 1% Beta: 1 Alpha: 0%")
            .with_field("symbol", "VTI")
            .with_field("name", "Vanguard Total Stock Market ETF");
        let outcome = lenient(&[fragment]);

        let SubRecord::Holding(holding) = &outcome.records[0].record else {
            panic!("expected holding");
        };
        assert_eq!(holding.symbol, "VTI");
        assert_eq!(holding.name, "Vanguard Total Stock Market ETF");
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_holding_without_symbol_is_dropped() {
        let outcome = lenient(&[ContentFragment::new("holding", "Value: $10 Weight: 1%")]);

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].field, "symbol");
    }

    #[test]
    fn test_sectors_zero_and_many() {
        let outcome = lenient(&[
            ContentFragment::new("sector_allocation", "Technology: 30% Finance: 25%"),
            ContentFragment::new("sector_allocation", "No breakdown available"),
        ]);

        assert_eq!(
            outcome.records[0].record,
            SubRecord::Sectors(vec![
                SectorAllocation::new("Technology", 30.0),
                SectorAllocation::new("Finance", 25.0),
            ])
        );
        assert_eq!(outcome.records[1].record, SubRecord::Sectors(vec![]));
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_risk_metrics() {
        let text = "Alpha: 5.00% Beta: 1.25 Sharpe Ratio: 1.8 Treynor Ratio: 0.12 \
                    Information Ratio: 0.6 VaR (95%): 2.10% Max Drawdown: -12.50%";
        let outcome = lenient(&[ContentFragment::new("risk_metrics", text)]);

        let SubRecord::RiskMetrics(metrics) = outcome.records[0].record else {
            panic!("expected risk metrics");
        };
        assert_relative_eq!(metrics.alpha, 0.05);
        assert_relative_eq!(metrics.beta, 1.25);
        assert_relative_eq!(metrics.sharpe_ratio, 1.8);
        assert_relative_eq!(metrics.treynor_ratio, 0.12);
        assert_relative_eq!(metrics.information_ratio, 0.6);
        assert_relative_eq!(metrics.var, 0.021);
        assert_relative_eq!(metrics.max_drawdown, -0.125);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_performance_invalid_month() {
        let outcome = lenient(&[ContentFragment::new(
            "historical_performance",
            "2021-01: $920,000 2021-13: $1",
        )]);

        let SubRecord::Performance(points) = &outcome.records[0].record else {
            panic!("expected performance");
        };
        assert_eq!(points.len(), 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].reason.contains("2021-13"));
    }

    #[test]
    fn test_performance_without_points_fails() {
        let fragments = [ContentFragment::new("historical_performance", "n/a")];
        assert!(extract(&fragments, ExtractionMode::Strict).is_err());

        let outcome = lenient(&fragments);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failures[0].field, "historicalPerformance");
    }

    #[test]
    fn test_unrecognized_tag_is_ignored() {
        let fragments = vec![
            ContentFragment::new("disclaimer", "Total Value: $99"),
            ContentFragment {
                text: "mock content".into(),
                ..Default::default()
            },
        ];
        let outcome = extract(&fragments, ExtractionMode::Strict).unwrap();

        assert!(outcome.records.is_empty());
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.ignored, vec![0, 1]);
    }
}
