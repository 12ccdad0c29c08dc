//! Portfolio records and the aggregate snapshot.
//!
//! Currency amounts are [`Decimal`]; ratios and fractions are `f64`.
//! All types serialize with camelCase keys, the shape consumed by the
//! presentation layer.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FolioError;

// =============================================================================
// PERIOD
// =============================================================================

/// A calendar month, written `YYYY-MM`.
///
/// Ordering is chronological, which matches lexicographic ordering of the
/// written form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Create a period, validating the month.
    pub fn new(year: i32, month: u32) -> Result<Self, FolioError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(FolioError::InvalidPeriod(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month of year, 1-12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Whole months from `self` to `other` (negative if `other` is earlier).
    #[must_use]
    pub fn months_until(&self, other: &YearMonth) -> i32 {
        (other.year - self.year) * 12 + other.month as i32 - self.month as i32
    }
}

impl FromStr for YearMonth {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FolioError::InvalidPeriod(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Weight of one sector, as a percentage (30 means 30%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAllocation {
    /// Sector name as written in the statement.
    pub name: String,
    /// Percentage of the portfolio.
    pub value: f64,
}

impl SectorAllocation {
    /// Create a sector allocation.
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A single position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Holding {
    /// Ticker symbol.
    pub symbol: String,
    /// Security name.
    pub name: String,
    /// Market value.
    pub value: Decimal,
    /// Fraction of the portfolio, 0 to 1.
    pub weight: f64,
    /// Beta against the market.
    pub beta: f64,
    /// Alpha as a fraction (0.025 means 2.5%).
    pub alpha: f64,
}

/// Portfolio-level risk statistics.
///
/// `alpha`, `var` and `max_drawdown` are fractions; the ratios are raw.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskMetrics {
    /// Jensen's alpha.
    pub alpha: f64,
    /// Beta against the benchmark.
    pub beta: f64,
    /// Sharpe ratio.
    pub sharpe_ratio: f64,
    /// Treynor ratio.
    pub treynor_ratio: f64,
    /// Information ratio.
    pub information_ratio: f64,
    /// Value at risk.
    pub var: f64,
    /// Maximum drawdown, usually negative.
    pub max_drawdown: f64,
}

/// Portfolio value at a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    /// Month of the observation.
    pub date: YearMonth,
    /// Portfolio value.
    pub value: Decimal,
}

impl PerformancePoint {
    /// Create a performance point.
    #[must_use]
    pub fn new(date: YearMonth, value: Decimal) -> Self {
        Self { date, value }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// The aggregated portfolio record handed to the presentation layer.
///
/// `Default` yields the documented empty state: zero numerics and empty
/// sequences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PortfolioSnapshot {
    /// Total market value.
    pub total_value: Decimal,
    /// Provider risk score.
    pub risk_score: f64,
    /// Sector weights, in statement order.
    pub sectors: Vec<SectorAllocation>,
    /// Positions, in statement order.
    pub holdings: Vec<Holding>,
    /// Risk statistics.
    pub risk_metrics: RiskMetrics,
    /// Values over time, ascending by month.
    pub historical_performance: Vec<PerformancePoint>,
}

impl PortfolioSnapshot {
    /// Returns true if nothing was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Find a holding by symbol (case-insensitive).
    #[must_use]
    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings
            .iter()
            .find(|h| h.symbol.eq_ignore_ascii_case(symbol))
    }

    /// The sector with the largest allocation, first one on ties.
    #[must_use]
    pub fn largest_sector(&self) -> Option<&SectorAllocation> {
        self.sectors
            .iter()
            .fold(None, |best: Option<&SectorAllocation>, s| match best {
                Some(b) if b.value >= s.value => Some(b),
                _ => Some(s),
            })
    }

    /// The holding with the largest weight, first one on ties.
    #[must_use]
    pub fn largest_holding(&self) -> Option<&Holding> {
        self.holdings
            .iter()
            .fold(None, |best: Option<&Holding>, h| match best {
                Some(b) if b.weight >= h.weight => Some(b),
                _ => Some(h),
            })
    }
}
