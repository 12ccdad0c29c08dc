//! Property-based tests for pipeline invariants.
//!
//! These tests verify properties that must hold for any input:
//! - Performance history comes out strictly ascending by month
//! - Written values are extracted exactly
//! - Unrecognized fragments never contribute or fail
//! - Lenient extraction never errors

use folio_extract::prelude::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// GENERATORS
// =============================================================================

fn period() -> impl Strategy<Value = (i32, u32)> {
    (1990i32..2040, 1u32..=12)
}

fn performance_fragment() -> impl Strategy<Value = ContentFragment> {
    prop::collection::vec((period(), 1u64..10_000_000), 1..6).prop_map(|points| {
        let text = points
            .iter()
            .map(|((y, m), v)| format!("{y:04}-{m:02}: ${v}"))
            .collect::<Vec<_>>()
            .join("\n");
        ContentFragment::new("historical_performance", text)
    })
}

fn unknown_tag() -> impl Strategy<Value = String> {
    "[a-z_]{1,20}".prop_filter("known tag", |tag| {
        !FragmentKind::from_tag(Some(tag.as_str())).is_recognized()
    })
}

proptest! {
    #[test]
    fn prop_performance_strictly_ascending(fragments in prop::collection::vec(performance_fragment(), 0..6)) {
        let report = Pipeline::default().run(&fragments).unwrap();
        let history = &report.snapshot.historical_performance;

        for pair in history.windows(2) {
            prop_assert!(pair[0].date < pair[1].date);
            prop_assert!(pair[0].date.to_string() < pair[1].date.to_string());
        }
    }

    #[test]
    fn prop_performance_order_independent(mut fragments in prop::collection::vec(performance_fragment(), 1..5)) {
        // With distinct months per document, fragment order does not matter.
        let mut seen = std::collections::HashSet::new();
        let all_distinct = fragments.iter().all(|f| {
            f.text.lines().all(|line| seen.insert(line[..7].to_string()))
        });
        prop_assume!(all_distinct);

        let forward = Pipeline::default().run(&fragments).unwrap();
        fragments.reverse();
        let backward = Pipeline::default().run(&fragments).unwrap();

        prop_assert_eq!(
            forward.snapshot.historical_performance,
            backward.snapshot.historical_performance
        );
    }

    #[test]
    fn prop_beta_extracted_exactly(int in 0u32..10, frac in 0u32..100) {
        let written = format!("{int}.{frac:02}");
        let fragments = vec![ContentFragment::new("risk_metrics", format!("Beta: {written}"))];
        let report = Pipeline::default().run(&fragments).unwrap();

        prop_assert_eq!(report.snapshot.risk_metrics.beta, written.parse::<f64>().unwrap());
    }

    #[test]
    fn prop_total_value_extracted_exactly(value in 0u64..1_000_000_000_000) {
        // Thousands separators as a statement would print them.
        let digits = value.to_string();
        let mut grouped = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        let text = format!("Total Value: ${grouped} Risk Score: 50");
        let report = Pipeline::default().run(&[ContentFragment::new("portfolio_summary", text)]).unwrap();

        prop_assert_eq!(report.snapshot.total_value, Decimal::from(value));
    }

    #[test]
    fn prop_unrecognized_contributes_nothing(tag in unknown_tag(), text in ".{0,80}") {
        let fragments = vec![ContentFragment::new(tag, text)];
        let report = Pipeline::new(ExtractionConfig::strict()).run(&fragments).unwrap();

        prop_assert!(report.snapshot.is_empty());
        prop_assert_eq!(report.ignored_fragments, vec![0]);
    }

    #[test]
    fn prop_lenient_never_errors(tags in prop::collection::vec(0usize..6, 0..10), text in ".{0,120}") {
        const TAGS: [&str; 6] = [
            "portfolio_summary",
            "sector_allocation",
            "holding",
            "risk_metrics",
            "historical_performance",
            "other",
        ];
        let fragments: Vec<ContentFragment> = tags
            .iter()
            .map(|&i| ContentFragment::new(TAGS[i], text.clone()))
            .collect();

        prop_assert!(Pipeline::default().run(&fragments).is_ok());
    }
}
