//! Integration tests for folio-extract.
//!
//! These tests run whole statements through the pipeline.

use approx::assert_relative_eq;
use folio_extract::prelude::*;
use folio_extract::{recommendations, what_if};
use rust_decimal_macros::dec;
use serde_json::json;
use std::collections::HashMap;

// =============================================================================
// TEST FIXTURES
// =============================================================================

/// A complete statement as a parsing provider would return it.
fn full_statement() -> Vec<ContentFragment> {
    let raw = json!([
        { "text": "Quarterly Statement", "metadata": { "page": 1 } },
        {
            "text": "Portfolio Summary\nTotal Value: $1,000,000\nRisk Score: 65",
            "metadata": { "type": "portfolio_summary", "page": 1 }
        },
        {
            "text": "Technology: 30% Finance: 25% Healthcare: 20%",
            "metadata": { "type": "sector_allocation", "page": 2 }
        },
        {
            "text": "Consumer Goods: 15% Energy: 10%",
            "metadata": { "type": "sector_allocation", "page": 2 }
        },
        {
            "text": "Symbol: AAPL Name: Apple Inc. Value: $600,000 Weight: 60.00% Beta: 1.20 Alpha: 2.50%",
            "metadata": { "type": "holding", "page": 3 }
        },
        {
            "text": "Symbol: JNJ Name: Johnson & Johnson Value: $400,000 Weight: 40.00% Beta: 0.70 Alpha: 1.00%",
            "metadata": { "type": "holding", "page": 3 }
        },
        {
            "text": "Alpha: 5.00% Beta: 1.25 Sharpe Ratio: 1.45 Treynor Ratio: 0.09 Information Ratio: 0.52 VaR (95%): 2.30% Max Drawdown: -12.40%",
            "metadata": { "type": "risk_metrics", "page": 4 }
        },
        {
            "text": "2022-01: $1,000,000\n2020-07: $850,000\n2021-01: $920,000",
            "metadata": { "type": "historical_performance", "page": 5 }
        },
        {
            "text": "2020-01: $800,000\n2021-07: $980,000",
            "metadata": { "type": "historical_performance", "page": 5 }
        }
    ]);
    serde_json::from_value(raw).unwrap()
}

// =============================================================================
// FULL DOCUMENTS
// =============================================================================

#[test]
fn test_full_statement() {
    let report = Pipeline::default().run(&full_statement()).unwrap();
    let snapshot = &report.snapshot;

    assert!(report.is_complete());
    assert_eq!(report.ignored_fragments, vec![0]);

    assert_eq!(snapshot.total_value, dec!(1000000));
    assert_eq!(snapshot.risk_score, 65.0);

    let sectors: Vec<(&str, f64)> = snapshot
        .sectors
        .iter()
        .map(|s| (s.name.as_str(), s.value))
        .collect();
    assert_eq!(
        sectors,
        vec![
            ("Technology", 30.0),
            ("Finance", 25.0),
            ("Healthcare", 20.0),
            ("Consumer Goods", 15.0),
            ("Energy", 10.0),
        ]
    );

    assert_eq!(snapshot.holdings.len(), 2);
    assert_eq!(snapshot.holdings[1].name, "Johnson & Johnson");
    assert_relative_eq!(snapshot.holdings[0].weight + snapshot.holdings[1].weight, 1.0);

    assert_relative_eq!(snapshot.risk_metrics.alpha, 0.05);
    assert_relative_eq!(snapshot.risk_metrics.beta, 1.25);
    assert_relative_eq!(snapshot.risk_metrics.max_drawdown, -0.124);

    let dates: Vec<String> = snapshot
        .historical_performance
        .iter()
        .map(|p| p.date.to_string())
        .collect();
    assert_eq!(
        dates,
        vec!["2020-01", "2020-07", "2021-01", "2021-07", "2022-01"]
    );
}

#[test]
fn test_full_statement_strict_succeeds() {
    // A well-formed statement passes strict mode unchanged.
    let strict = Pipeline::new(ExtractionConfig::strict())
        .run(&full_statement())
        .unwrap();
    let lenient = Pipeline::default().run(&full_statement()).unwrap();

    assert_eq!(strict.snapshot, lenient.snapshot);
}

#[test]
fn test_one_malformed_fragment() {
    let mut fragments = full_statement();
    fragments.push(ContentFragment::new("holding", "Symbol: MSFT Weight: 5%"));

    // Strict: the whole document fails.
    let err = Pipeline::new(ExtractionConfig::strict())
        .run(&fragments)
        .unwrap_err();
    assert!(matches!(err, FolioError::FieldMissing { fragment: 9, .. }));

    // Lenient: everything else survives.
    let report = Pipeline::default().run(&fragments).unwrap();
    assert_eq!(report.snapshot.holdings.len(), 3);
    let msft = report.snapshot.holding("MSFT").unwrap();
    assert_eq!(msft.name, "MSFT");
    assert_relative_eq!(msft.weight, 0.05);

    let fields: Vec<&str> = report
        .extraction_failures
        .iter()
        .map(|f| f.field.as_str())
        .collect();
    assert_eq!(fields, vec!["name", "value", "beta", "alpha"]);
}

#[test]
fn test_zero_fragments() {
    let report = Pipeline::default().run(&[]).unwrap();

    assert!(report.snapshot.is_empty());
    assert!(report.is_complete());
}

#[test]
fn test_beta_round_trip() {
    let fragments = vec![ContentFragment::new("risk_metrics", "Beta: 1.25")];
    let report = Pipeline::default().run(&fragments).unwrap();

    assert_eq!(report.snapshot.risk_metrics.beta, 1.25);
}

#[test]
fn test_alpha_percent() {
    let fragments = vec![ContentFragment::new("risk_metrics", "Alpha: 5.00%")];
    let report = Pipeline::default().run(&fragments).unwrap();

    assert_eq!(report.snapshot.risk_metrics.alpha, 0.05);
}

#[test]
fn test_risk_metrics_last_wins_across_document() {
    let fragments = vec![
        ContentFragment::new("risk_metrics", "Beta: 1.0 Sharpe Ratio: 2.0"),
        ContentFragment::new("risk_metrics", "Beta: 2.0"),
    ];
    let report = Pipeline::default().run(&fragments).unwrap();

    assert_eq!(report.snapshot.risk_metrics.beta, 2.0);
    // Wholesale replacement: the earlier Sharpe ratio is gone.
    assert_eq!(report.snapshot.risk_metrics.sharpe_ratio, 0.0);
}

#[test]
fn test_reject_policy_across_document() {
    let fragments = vec![
        ContentFragment::new("risk_metrics", "Beta: 1.0"),
        ContentFragment::new("disclaimer", "Past performance..."),
        ContentFragment::new("risk_metrics", "Beta: 2.0"),
    ];
    let config = ExtractionConfig::default().with_risk_metrics(RiskMetricsPolicy::Reject);
    let err = Pipeline::new(config).run(&fragments).unwrap_err();

    assert_eq!(
        err,
        FolioError::ConflictingRiskMetrics {
            first: 0,
            second: 2
        }
    );
}

#[test]
fn test_json_output_shape() {
    let report = Pipeline::default().run(&full_statement()).unwrap();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["totalValue"], json!(1000000.0));
    assert_eq!(value["sectors"][0]["name"], "Technology");
    assert_eq!(value["holdings"][0]["symbol"], "AAPL");
    assert_eq!(value["riskMetrics"]["beta"], json!(1.25));
    assert_eq!(value["historicalPerformance"][0]["date"], "2020-01");
    assert_eq!(value["extractionFailures"], json!([]));
}

// =============================================================================
// ANALYTICS ON EXTRACTED DATA
// =============================================================================

#[test]
fn test_what_if_on_extracted_snapshot() {
    let report = Pipeline::default().run(&full_statement()).unwrap();
    let overrides = HashMap::from([("AAPL".to_string(), 0.2), ("JNJ".to_string(), 0.8)]);
    let result = what_if(&report.snapshot, &overrides).unwrap();

    assert_relative_eq!(result.before.beta, 0.6 * 1.2 + 0.4 * 0.7);
    assert_relative_eq!(result.after.beta, 0.2 * 1.2 + 0.8 * 0.7);
}

#[test]
fn test_recommendations_on_extracted_snapshot() {
    let report = Pipeline::default().run(&full_statement()).unwrap();
    let recs = recommendations(&report.snapshot);

    assert!(recs.iter().any(|r| r.contains("Technology")));
    assert!(recs.iter().any(|r| r.contains("beta of 1.25")));
    assert!(recs.iter().any(|r| r.contains("Only 2 holdings")));
}
