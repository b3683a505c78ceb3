// src/portfolio/models.rs
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix shared by every snapshot name.
pub const GENERATION_PREFIX: &str = "Statistics_";
/// Timestamp layout encoded in snapshot names, at second resolution.
pub const GENERATION_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Per-stock statistics, formatted for serialization.
///
/// Every numeric field is a fixed two-decimal string. Ranking and
/// arithmetic happen upstream on exact decimals; these strings are
/// never parsed back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockStat {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Ticker")]
    pub ticker: String,
    /// Average buy value times number of shares.
    #[serde(rename = "Total Investment (€)")]
    pub total_investment: String,
    #[serde(rename = "Average Buy Value (€)")]
    pub average_buy_value: String,
    #[serde(rename = "Number of shares")]
    pub number_of_shares: String,
    /// Value declared by the broker export, carried through unchanged.
    #[serde(rename = "Total value (€)")]
    pub total_value_declared: String,
    #[serde(rename = "Profit/Loss (€)")]
    pub profit_loss: String,
    /// Zero when the average buy value is zero.
    #[serde(rename = "Percentage Change (%)")]
    pub percentage_change: String,
    /// Current price times number of shares.
    #[serde(rename = "Total Stock Value (€)")]
    pub total_stock_value: String,
}

/// Statistics for all priced positions held at one broker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerAggregate {
    /// Serialized key carries no currency suffix, unlike the
    /// portfolio-level field.
    #[serde(rename = "Total Portfolio Value")]
    pub total_portfolio_value: String,
    #[serde(rename = "Total Investment (€)")]
    pub total_investment: String,
    /// Sum of strictly positive per-stock profits.
    #[serde(rename = "Total Win (€)")]
    pub total_win: String,
    /// Sum of absolute values of strictly negative per-stock profits.
    #[serde(rename = "Total Loss (€)")]
    pub total_loss: String,
    /// Net profit: win minus loss.
    #[serde(rename = "Total Profit (€)")]
    pub total_profit: String,
    #[serde(rename = "Stocks")]
    pub stocks: Vec<StockStat>,
    /// First three stocks by profit/loss, descending.
    #[serde(rename = "Top 3 Winners by Profit (€)")]
    pub top_winners: Vec<StockStat>,
    /// Last three of the same descending order, stored order preserved.
    /// With fewer than four stocks the two lists overlap.
    #[serde(rename = "Top 3 Losers by Profit (€)")]
    pub top_losers: Vec<StockStat>,
}

/// A full portfolio statistics record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Generation identifier, e.g. `Statistics_2024-03-01_09-30-00`.
    #[serde(rename = "Name")]
    pub name: String,
    /// Generation time as a first-class field. Absent on records
    /// produced by older tooling, which only encode it in the name.
    #[serde(
        rename = "Generated At",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(rename = "Total Portfolio Value (€)")]
    pub total_portfolio_value: String,
    #[serde(rename = "Total Invested Funds (€)")]
    pub total_invested_funds: String,
    #[serde(rename = "Total Win (€)")]
    pub total_win: String,
    #[serde(rename = "Total Profit (€)")]
    pub total_profit: String,
    #[serde(rename = "Total Loss (€)")]
    pub total_loss: String,
    /// Keyed by broker name.
    #[serde(rename = "Portfolio by Broker")]
    pub by_broker: BTreeMap<String, BrokerAggregate>,
}

impl PortfolioSnapshot {
    /// Timestamp this snapshot was generated at.
    ///
    /// Prefers the recorded generation time and falls back to the
    /// timestamp encoded in the name.
    pub fn timestamp(&self) -> Result<DateTime<Utc>, IdentifierError> {
        if let Some(generated_at) = self.generated_at {
            return Ok(generated_at);
        }
        Ok(parse_generation_name(&self.name)?.and_utc())
    }
}

/// A snapshot name that cannot be interpreted as a generation identifier.
#[derive(Debug, Error)]
pub enum IdentifierError {
    #[error("Snapshot name `{0}` does not start with `{GENERATION_PREFIX}`")]
    MissingPrefix(String),
    #[error("Snapshot name `{name}` has a malformed timestamp")]
    InvalidTimestamp {
        name: String,
        source: chrono::ParseError,
    },
}

/// Builds the generation identifier for the given time.
pub fn generation_name(at: DateTime<Utc>) -> String {
    format!("{GENERATION_PREFIX}{}", at.format(GENERATION_FORMAT))
}

/// Recovers the timestamp encoded in a generation identifier.
pub fn parse_generation_name(name: &str) -> Result<NaiveDateTime, IdentifierError> {
    let rest = name
        .strip_prefix(GENERATION_PREFIX)
        .ok_or_else(|| IdentifierError::MissingPrefix(name.to_string()))?;

    NaiveDateTime::parse_from_str(rest, GENERATION_FORMAT).map_err(|source| {
        IdentifierError::InvalidTimestamp {
            name: name.to_string(),
            source,
        }
    })
}
