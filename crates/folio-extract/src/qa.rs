//! Question answering over a snapshot.
//!
//! Questions are routed by keyword to one topic and answered from the
//! snapshot's figures. There is no language model behind this.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use folio_core::PortfolioSnapshot;

use crate::analytics::{effective_beta, recommendations};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Sharpe,
    Treynor,
    InformationRatio,
    ValueAtRisk,
    Drawdown,
    Beta,
    Alpha,
    RiskScore,
    Sector,
    Holding,
    Performance,
    TotalValue,
    Advice,
}

// Checked in order; more specific phrases first.
const TOPICS: &[(Topic, &[&str])] = &[
    (Topic::Sharpe, &["sharpe"]),
    (Topic::Treynor, &["treynor"]),
    (Topic::InformationRatio, &["information ratio"]),
    (Topic::ValueAtRisk, &["value at risk", "var"]),
    (Topic::Drawdown, &["drawdown"]),
    (Topic::Beta, &["beta", "volatil", "market risk"]),
    (Topic::Alpha, &["alpha", "outperform"]),
    (Topic::RiskScore, &["risk score", "risky", "risk level"]),
    (Topic::Sector, &["sector", "industry", "concentrat"]),
    (Topic::Holding, &["holding", "position", "stock", "largest"]),
    (Topic::Performance, &["perform", "return", "grow", "history"]),
    (Topic::TotalValue, &["total value", "worth", "how much", "value"]),
    (Topic::Advice, &["recommend", "suggest", "should i", "improve", "diversif"]),
];

fn route(question: &str) -> Option<Topic> {
    let q = question.to_lowercase();
    let words: Vec<&str> = q
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    TOPICS.iter().find_map(|(topic, keys)| {
        keys.iter()
            .any(|key| {
                if key.contains(' ') || key.len() > 3 {
                    q.contains(key)
                } else {
                    // Short keys must match a whole word ("var" but not "various").
                    words.contains(key)
                }
            })
            .then_some(*topic)
    })
}

/// Format an amount as `$1,234,567.89` (cents dropped when zero).
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let whole = abs.trunc().to_string();
    let cents = ((abs - abs.trunc()) * Decimal::ONE_HUNDRED)
        .round()
        .to_u32()
        .unwrap_or(0);

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    if cents == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{cents:02}")
    }
}

/// Answer a question about a portfolio.
///
/// Without a snapshot, or when no topic matches, a generic answer is given.
#[must_use]
pub fn answer_question(question: &str, snapshot: Option<&PortfolioSnapshot>) -> String {
    let Some(snapshot) = snapshot else {
        return format!(
            "Upload a portfolio statement first so I can answer: \"{}\"",
            question.trim()
        );
    };

    let metrics = &snapshot.risk_metrics;
    match route(question) {
        Some(Topic::Sharpe) => format!(
            "The portfolio's Sharpe ratio is {:.2}.",
            metrics.sharpe_ratio
        ),
        Some(Topic::Treynor) => format!(
            "The portfolio's Treynor ratio is {:.2}.",
            metrics.treynor_ratio
        ),
        Some(Topic::InformationRatio) => format!(
            "The portfolio's information ratio is {:.2}.",
            metrics.information_ratio
        ),
        Some(Topic::ValueAtRisk) => format!(
            "The portfolio's value at risk is {:.2}% of its value.",
            metrics.var * 100.0
        ),
        Some(Topic::Drawdown) => format!(
            "The maximum drawdown is {:.2}%.",
            metrics.max_drawdown * 100.0
        ),
        Some(Topic::Beta) => match effective_beta(snapshot) {
            Some(beta) => format!("The portfolio beta is {beta:.2}."),
            None => "No beta was found in the statement.".to_string(),
        },
        Some(Topic::Alpha) => format!("The portfolio alpha is {:.2}%.", metrics.alpha * 100.0),
        Some(Topic::RiskScore) => format!("The risk score is {}.", snapshot.risk_score),
        Some(Topic::Sector) => match snapshot.largest_sector() {
            Some(sector) => format!(
                "The largest sector is {} at {}% across {} sectors.",
                sector.name,
                sector.value,
                snapshot.sectors.len()
            ),
            None => "No sector allocation was found in the statement.".to_string(),
        },
        Some(Topic::Holding) => match snapshot.largest_holding() {
            Some(h) => format!(
                "The largest holding is {} ({}) at {:.1}% of the portfolio, worth {}.",
                h.name,
                h.symbol,
                h.weight * 100.0,
                format_amount(h.value)
            ),
            None => "No holdings were found in the statement.".to_string(),
        },
        Some(Topic::Performance) => describe_performance(snapshot),
        Some(Topic::TotalValue) => format!(
            "The total portfolio value is {}.",
            format_amount(snapshot.total_value)
        ),
        Some(Topic::Advice) => {
            let recs = recommendations(snapshot);
            if recs.is_empty() {
                "No changes stand out from the extracted figures.".to_string()
            } else {
                recs.join(" ")
            }
        }
        None => format!(
            "I could not match \"{}\" to a portfolio figure. The portfolio is worth {} \
             with a risk score of {}.",
            question.trim(),
            format_amount(snapshot.total_value),
            snapshot.risk_score
        ),
    }
}

fn describe_performance(snapshot: &PortfolioSnapshot) -> String {
    let history = &snapshot.historical_performance;
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return "No performance history was found in the statement.".to_string();
    };
    if history.len() == 1 || first.value.is_zero() {
        return format!(
            "The portfolio was worth {} in {}.",
            format_amount(last.value),
            last.date
        );
    }

    let change = (last.value - first.value) / first.value * Decimal::ONE_HUNDRED;
    format!(
        "The portfolio moved from {} in {} to {} in {}, a change of {:.1}% over {} months.",
        format_amount(first.value),
        first.date,
        format_amount(last.value),
        last.date,
        change.to_f64().unwrap_or_default(),
        first.date.months_until(&last.date)
    )
}
