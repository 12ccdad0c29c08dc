//! Field labels and value parsers.
//!
//! Each field the extractor knows is a [`FieldPattern`]: a label regex with a
//! single capture group for the value. Values are read in one of three forms:
//!
//! - amounts: optional `$`, thousands separators, optional sign (`$1,000,000`)
//! - numbers: plain decimals (`1.25`)
//! - percentages: decimals followed by `%`, returned as fractions (`5.00%` -> 0.05)
//!
//! A label's value must sit on the same line as the label, so an empty
//! `Symbol:` line never borrows the next line's text.
//!
//! Two scanners ([`scan_sectors`], [`scan_performance`]) return every match in
//! a text instead of the first one.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

// Thousands groups are exactly three digits; `\b` stops `800,000,2020` at `800,000`.
const AMOUNT: &str = r"(-?[ \t]?\$?[ \t]?-?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?\b)";
const NUMBER: &str = r"([-+]?\d+(?:\.\d+)?)";
// The `%` is optional here so a bare number reads as invalid rather than missing.
const PERCENT: &str = r"([-+]?\d+(?:\.\d+)?(?:[ \t]*%)?)";
const PERCENT_SIGNED: &str = r"([-+]?\d+(?:\.\d+)?)[ \t]*%";

/// Why a single field could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The label was not found.
    Missing,
    /// The label was found but the value did not parse.
    Invalid(String),
}

/// A labelled field with one value capture.
#[derive(Debug)]
pub struct FieldPattern {
    field: &'static str,
    regex: Regex,
}

impl FieldPattern {
    fn new(field: &'static str, pattern: &str) -> Self {
        Self {
            field,
            regex: Regex::new(pattern).expect("field pattern must compile"),
        }
    }

    /// Output field name (camelCase, as in the snapshot JSON).
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Raw captured value of the first match.
    #[must_use]
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }

    /// Read the value as free text.
    pub fn text(&self, text: &str) -> Result<String, FieldError> {
        match self.capture(text) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(FieldError::Missing),
        }
    }

    /// Read the value as a currency amount.
    pub fn amount(&self, text: &str) -> Result<Decimal, FieldError> {
        let raw = self.capture(text).ok_or(FieldError::Missing)?;
        parse_amount(raw).ok_or_else(|| FieldError::Invalid(raw.to_string()))
    }

    /// Read the value as a plain number.
    pub fn number(&self, text: &str) -> Result<f64, FieldError> {
        let raw = self.capture(text).ok_or(FieldError::Missing)?;
        raw.parse::<f64>()
            .map_err(|_| FieldError::Invalid(raw.to_string()))
    }

    /// Read a percentage and return it as a fraction.
    ///
    /// The value must carry a `%` sign.
    pub fn percent(&self, text: &str) -> Result<f64, FieldError> {
        let raw = self.capture(text).ok_or(FieldError::Missing)?;
        let invalid = || FieldError::Invalid(raw.to_string());
        let number = raw.strip_suffix('%').ok_or_else(invalid)?;
        number
            .trim()
            .parse::<f64>()
            .map(|v| v / 100.0)
            .map_err(|_| invalid())
    }
}

/// Parse an amount such as `$1,000,000.50` or `-$2,500`.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

// =============================================================================
// LABELS
// =============================================================================

// Portfolio summary
pub(crate) static TOTAL_VALUE: Lazy<FieldPattern> =
    Lazy::new(|| FieldPattern::new("totalValue", &format!(r"(?i)Total\s+Value[ \t]*:[ \t]*{AMOUNT}")));
pub(crate) static RISK_SCORE: Lazy<FieldPattern> =
    Lazy::new(|| FieldPattern::new("riskScore", &format!(r"(?i)Risk\s+Score[ \t]*:[ \t]*{NUMBER}")));

// Holding
pub(crate) static SYMBOL: Lazy<FieldPattern> = Lazy::new(|| {
    FieldPattern::new("symbol", r"(?i)\bSymbol[ \t]*:[ \t]*([A-Za-z0-9][A-Za-z0-9.\-]*)")
});
pub(crate) static NAME: Lazy<FieldPattern> = Lazy::new(|| {
    FieldPattern::new(
        "name",
        r"(?im)\bName[ \t]*:[ \t]*(.+?)[ \t]*(?:\b(?:Symbol|Value|Weight|Beta|Alpha)[ \t]*:|$)",
    )
});
pub(crate) static VALUE: Lazy<FieldPattern> =
    Lazy::new(|| FieldPattern::new("value", &format!(r"(?i)\bValue[ \t]*:[ \t]*{AMOUNT}")));
pub(crate) static WEIGHT: Lazy<FieldPattern> =
    Lazy::new(|| FieldPattern::new("weight", &format!(r"(?i)\bWeight[ \t]*:[ \t]*{PERCENT}")));

// Shared by holdings and risk metrics
pub(crate) static BETA: Lazy<FieldPattern> =
    Lazy::new(|| FieldPattern::new("beta", &format!(r"(?i)\bBeta[ \t]*:[ \t]*{NUMBER}")));
pub(crate) static ALPHA: Lazy<FieldPattern> =
    Lazy::new(|| FieldPattern::new("alpha", &format!(r"(?i)\bAlpha[ \t]*:[ \t]*{PERCENT}")));

// Risk metrics
pub(crate) static SHARPE_RATIO: Lazy<FieldPattern> = Lazy::new(|| {
    FieldPattern::new("sharpeRatio", &format!(r"(?i)Sharpe\s+Ratio[ \t]*:[ \t]*{NUMBER}"))
});
pub(crate) static TREYNOR_RATIO: Lazy<FieldPattern> = Lazy::new(|| {
    FieldPattern::new("treynorRatio", &format!(r"(?i)Treynor\s+Ratio[ \t]*:[ \t]*{NUMBER}"))
});
pub(crate) static INFORMATION_RATIO: Lazy<FieldPattern> = Lazy::new(|| {
    FieldPattern::new(
        "informationRatio",
        &format!(r"(?i)Information\s+Ratio[ \t]*:[ \t]*{NUMBER}"),
    )
});
// "VaR: 2.5%" or "VaR (95%): 2.5%"
pub(crate) static VAR: Lazy<FieldPattern> =
    Lazy::new(|| FieldPattern::new("var", &format!(r"\bVaR\b[^:\n]*:[ \t]*{PERCENT}")));
pub(crate) static MAX_DRAWDOWN: Lazy<FieldPattern> = Lazy::new(|| {
    FieldPattern::new(
        "maxDrawdown",
        &format!(r"(?i)Max(?:imum)?\.?\s+Drawdown[ \t]*:[ \t]*{PERCENT}"),
    )
});

// Sector names are capitalised words, joined by `&`, `and` or `of`. Names
// never span lines.
static SECTOR_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"([A-Z][A-Za-z/\-]*(?:[ \t]+(?:[A-Z][A-Za-z/\-]*|&|and|of))*)[ \t]*:[ \t]*{PERCENT_SIGNED}"
    ))
    .expect("sector pattern must compile")
});

// Headings that statements print on the same line as the first sector.
static SECTOR_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:Sector|Industry)[ \t]+(?:Allocations?|Breakdown|Weights?|Exposures?)|Sectors|Allocation)[ \t]+",
    )
    .expect("sector heading pattern must compile")
});

static PERFORMANCE_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(\d{{4}}-\d{{2}})[ \t]*:[ \t]*{AMOUNT}"))
        .expect("performance pattern must compile")
});

/// Every `<Name>: <number>%` pair in `text`, in order.
///
/// Values are returned as written (30 for `30%`).
#[must_use]
pub fn scan_sectors(text: &str) -> Vec<(String, Result<f64, FieldError>)> {
    SECTOR_ENTRY
        .captures_iter(text)
        .map(|caps| {
            let name = SECTOR_HEADING.replace(caps[1].trim(), "").into_owned();
            let raw = &caps[2];
            let value = raw
                .parse::<f64>()
                .map_err(|_| FieldError::Invalid(raw.to_string()));
            (name, value)
        })
        .collect()
}

/// Every `YYYY-MM: <amount>` pair in `text`, in order.
///
/// The period is returned unparsed so the caller can report invalid months.
#[must_use]
pub fn scan_performance(text: &str) -> Vec<(String, Result<Decimal, FieldError>)> {
    PERFORMANCE_ENTRY
        .captures_iter(text)
        .map(|caps| {
            let raw = caps[2].trim();
            let value = parse_amount(raw).ok_or_else(|| FieldError::Invalid(raw.to_string()));
            (caps[1].to_string(), value)
        })
        .collect()
}
