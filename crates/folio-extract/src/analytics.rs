//! Snapshot analytics.
//!
//! Provides figures recomputed from an extracted snapshot:
//! - Weighted beta and alpha across holdings
//! - What-if reweighting of holdings
//! - Rule-based recommendations
//!
//! All functions are pure; the snapshot is never modified in place.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use folio_core::{Holding, PortfolioSnapshot};

/// Sector share (percent) above which a sector counts as concentrated.
pub const SECTOR_CONCENTRATION_PCT: f64 = 25.0;
/// Portfolio beta above which the portfolio counts as aggressive.
pub const HIGH_BETA: f64 = 1.2;
/// Portfolio beta below which the portfolio counts as defensive.
pub const LOW_BETA: f64 = 0.8;
/// Drawdown (fraction) beyond which a warning is raised.
pub const DEEP_DRAWDOWN: f64 = -0.20;
/// Holding count below which the portfolio counts as undiversified.
pub const MIN_HOLDINGS: usize = 5;

/// Errors for analytics inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// The override names a symbol not held.
    #[error("Unknown holding: {0}")]
    UnknownSymbol(String),

    /// The override weight is negative or not finite.
    #[error("Invalid weight for holding '{symbol}': {weight}")]
    InvalidWeight {
        /// The holding symbol.
        symbol: String,
        /// The rejected weight.
        weight: f64,
    },

    /// The snapshot has no holdings to reweight.
    #[error("Portfolio has no holdings")]
    NoHoldings,
}

/// Sum of holding weights (≈1 for a complete statement).
#[must_use]
pub fn weight_sum(holdings: &[Holding]) -> f64 {
    holdings.iter().map(|h| h.weight).sum()
}

/// Σ weight·beta over holdings.
#[must_use]
pub fn weighted_beta(holdings: &[Holding]) -> f64 {
    holdings.iter().map(|h| h.weight * h.beta).sum()
}

/// Σ weight·alpha over holdings.
#[must_use]
pub fn weighted_alpha(holdings: &[Holding]) -> f64 {
    holdings.iter().map(|h| h.weight * h.alpha).sum()
}

/// Weighted exposures of a set of holdings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exposure {
    /// Sum of weights.
    pub weight_sum: f64,
    /// Weighted beta.
    pub beta: f64,
    /// Weighted alpha.
    pub alpha: f64,
}

impl Exposure {
    /// Compute exposures for holdings.
    #[must_use]
    pub fn of(holdings: &[Holding]) -> Self {
        Self {
            weight_sum: weight_sum(holdings),
            beta: weighted_beta(holdings),
            alpha: weighted_alpha(holdings),
        }
    }
}

/// Result of a what-if reweighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfResult {
    /// Holdings with the new weights. Values are unchanged.
    pub holdings: Vec<Holding>,
    /// Exposures before reweighting.
    pub before: Exposure,
    /// Exposures after reweighting.
    pub after: Exposure,
}

/// Apply weight overrides and recompute exposures.
///
/// Overrides are fractions keyed by symbol (case-insensitive). After applying
/// them, weights are renormalized to sum to 1, unless they all are zero.
///
/// # Errors
///
/// Returns an error for an empty portfolio, an unknown symbol, or a negative
/// or non-finite weight.
pub fn what_if(
    snapshot: &PortfolioSnapshot,
    overrides: &HashMap<String, f64>,
) -> Result<WhatIfResult, AnalyticsError> {
    if snapshot.holdings.is_empty() {
        return Err(AnalyticsError::NoHoldings);
    }

    let mut holdings = snapshot.holdings.clone();
    for (symbol, &weight) in overrides {
        if !weight.is_finite() || weight < 0.0 {
            return Err(AnalyticsError::InvalidWeight {
                symbol: symbol.clone(),
                weight,
            });
        }
        let holding = holdings
            .iter_mut()
            .find(|h| h.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| AnalyticsError::UnknownSymbol(symbol.clone()))?;
        holding.weight = weight;
    }

    let total = weight_sum(&holdings);
    if total > 0.0 {
        for holding in &mut holdings {
            holding.weight /= total;
        }
    }

    Ok(WhatIfResult {
        before: Exposure::of(&snapshot.holdings),
        after: Exposure::of(&holdings),
        holdings,
    })
}

/// Portfolio beta: the reported figure, or the holdings-weighted one when the
/// statement carried none.
#[must_use]
pub fn effective_beta(snapshot: &PortfolioSnapshot) -> Option<f64> {
    if snapshot.risk_metrics.beta != 0.0 {
        Some(snapshot.risk_metrics.beta)
    } else if !snapshot.holdings.is_empty() {
        Some(weighted_beta(&snapshot.holdings))
    } else {
        None
    }
}

/// Rule-based suggestions for a snapshot.
#[must_use]
pub fn recommendations(snapshot: &PortfolioSnapshot) -> Vec<String> {
    let mut out = Vec::new();

    if snapshot.sectors.is_empty() {
        out.push(
            "No sector allocation was found, so sector concentration could not be assessed."
                .to_string(),
        );
    }
    for sector in &snapshot.sectors {
        if sector.value > SECTOR_CONCENTRATION_PCT {
            out.push(format!(
                "Consider diversifying your {} sector holdings ({:.0}% of the portfolio) to reduce risk.",
                sector.name, sector.value
            ));
        }
    }

    match effective_beta(snapshot) {
        Some(beta) if beta > HIGH_BETA => out.push(format!(
            "Portfolio beta of {beta:.2} is above {HIGH_BETA}; increasing the bond allocation would add stability."
        )),
        Some(beta) if beta > 0.0 && beta < LOW_BETA => out.push(format!(
            "Portfolio beta of {beta:.2} is below {LOW_BETA}; the portfolio may lag in rising markets."
        )),
        _ => {}
    }

    if snapshot.risk_metrics.max_drawdown < DEEP_DRAWDOWN {
        out.push(format!(
            "Maximum drawdown of {:.1}% is deep; review position sizing and downside protection.",
            snapshot.risk_metrics.max_drawdown * 100.0
        ));
    }

    let count = snapshot.holdings.len();
    if count > 0 && count < MIN_HOLDINGS {
        out.push(format!(
            "Only {count} holdings were found; adding international exposure would improve diversification."
        ));
    }
    if count > 0 {
        let sum = weight_sum(&snapshot.holdings);
        if (sum - 1.0).abs() > 0.05 {
            out.push(format!(
                "Holding weights sum to {:.1}%; the statement may list only part of the portfolio.",
                sum * 100.0
            ));
        }
    }

    out
}
