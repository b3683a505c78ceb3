//! Decoding of broker holdings exports.
//!
//! Exports are semicolon-delimited with a header row and locale-formatted
//! numerics (comma as decimal separator). Rows that fail to parse are
//! reported alongside the accepted positions; they never abort the batch.

use std::io::Read;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Position;

const FIELD_NAME: &str = "Name";
const FIELD_TICKER: &str = "ticker";
const FIELD_BROKER: &str = "Broker";
const FIELD_AVERAGE_BUY_VALUE: &str = "Average Buy Value";
const FIELD_NUMBER_OF_SHARES: &str = "Number of shares";
const FIELD_TOTAL_VALUE: &str = "Total value";

/// Why a holdings row was rejected.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a number: `{value}`")]
    BadNumber { field: &'static str, value: String },
}

/// A rejected input row: 1-based record number (header excluded) plus the
/// reason it failed to parse.
#[derive(Debug)]
pub struct RejectedRow {
    pub record: usize,
    pub reason: RowError,
}

/// Result of decoding a holdings export: accepted positions in input order
/// plus the rows that failed to parse.
#[derive(Debug, Default)]
pub struct HoldingsImport {
    pub positions: Vec<Position>,
    pub rejected: Vec<RejectedRow>,
}

/// Column offsets of the required fields within one export.
struct HeaderIndex {
    name: usize,
    ticker: usize,
    broker: usize,
    average_buy_value: usize,
    number_of_shares: usize,
    total_value: usize,
}

impl HeaderIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |field: &str| {
            headers
                .iter()
                .position(|h| h == field)
                .with_context(|| format!("Holdings header is missing required column `{field}`"))
        };

        Ok(Self {
            name: find(FIELD_NAME)?,
            ticker: find(FIELD_TICKER)?,
            broker: find(FIELD_BROKER)?,
            average_buy_value: find(FIELD_AVERAGE_BUY_VALUE)?,
            number_of_shares: find(FIELD_NUMBER_OF_SHARES)?,
            total_value: find(FIELD_TOTAL_VALUE)?,
        })
    }

    fn parse_record(&self, record: &StringRecord) -> Result<Position, RowError> {
        let get = |index: usize, field: &'static str| {
            record.get(index).ok_or(RowError::MissingField(field))
        };

        Ok(Position {
            name: get(self.name, FIELD_NAME)?.to_string(),
            ticker: get(self.ticker, FIELD_TICKER)?.to_string(),
            broker: get(self.broker, FIELD_BROKER)?.to_string(),
            average_buy_value: parse_decimal(
                FIELD_AVERAGE_BUY_VALUE,
                get(self.average_buy_value, FIELD_AVERAGE_BUY_VALUE)?,
            )?,
            number_of_shares: parse_decimal(
                FIELD_NUMBER_OF_SHARES,
                get(self.number_of_shares, FIELD_NUMBER_OF_SHARES)?,
            )?,
            total_value_declared: parse_decimal(
                FIELD_TOTAL_VALUE,
                get(self.total_value, FIELD_TOTAL_VALUE)?,
            )?,
        })
    }
}

/// Parse a locale-formatted decimal: comma decimal separators are normalized
/// to dots before parsing, so both `5,50` and `5.50` are accepted.
fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, RowError> {
    value
        .trim()
        .replace(',', ".")
        .parse::<Decimal>()
        .map_err(|_| RowError::BadNumber {
            field,
            value: value.to_string(),
        })
}

/// Decode a semicolon-delimited holdings export.
///
/// A header missing a required column fails the whole batch; individual rows
/// that fail to parse are collected in [`HoldingsImport::rejected`].
pub fn parse_holdings<R: Read>(reader: R) -> Result<HoldingsImport> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .context("Failed to read holdings header")?
        .clone();
    let index = HeaderIndex::from_headers(&headers)?;

    let mut import = HoldingsImport::default();
    for (i, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read holdings record {}", i + 1))?;
        match index.parse_record(&record) {
            Ok(position) => import.positions.push(position),
            Err(reason) => import.rejected.push(RejectedRow {
                record: i + 1,
                reason,
            }),
        }
    }

    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const HEADER: &str = "Name;ticker;Broker;Average Buy Value;Number of shares;Total value";

    fn parse(csv: &str) -> HoldingsImport {
        parse_holdings(csv.as_bytes()).unwrap()
    }

    #[test]
    fn parses_comma_decimal_fields() {
        let import = parse(&format!(
            "{HEADER}\nApple Inc;AAPL;DeGiro;150,25;10;1502,50\n"
        ));

        assert_eq!(import.rejected.len(), 0);
        assert_eq!(import.positions.len(), 1);

        let position = &import.positions[0];
        assert_eq!(position.name, "Apple Inc");
        assert_eq!(position.ticker, "AAPL");
        assert_eq!(position.broker, "DeGiro");
        assert_eq!(
            position.average_buy_value,
            Decimal::from_str("150.25").unwrap()
        );
        assert_eq!(position.number_of_shares, Decimal::from_str("10").unwrap());
        assert_eq!(
            position.total_value_declared,
            Decimal::from_str("1502.50").unwrap()
        );
    }

    #[test]
    fn accepts_dot_decimals() {
        let import = parse(&format!("{HEADER}\nApple Inc;AAPL;DeGiro;150.25;10.5;1577.63\n"));

        assert_eq!(import.positions.len(), 1);
        assert_eq!(
            import.positions[0].number_of_shares,
            Decimal::from_str("10.5").unwrap()
        );
    }

    #[test]
    fn rejects_bad_number_and_keeps_later_rows() {
        let import = parse(&format!(
            "{HEADER}\nBroken;BRK;DeGiro;not-a-number;10;100\nApple Inc;AAPL;DeGiro;150,25;10;1502,50\n"
        ));

        assert_eq!(import.positions.len(), 1);
        assert_eq!(import.positions[0].ticker, "AAPL");

        assert_eq!(import.rejected.len(), 1);
        let rejected = &import.rejected[0];
        assert_eq!(rejected.record, 1);
        assert!(matches!(
            rejected.reason,
            RowError::BadNumber {
                field: "Average Buy Value",
                ..
            }
        ));
    }

    #[test]
    fn rejects_empty_numeric_field() {
        let import = parse(&format!("{HEADER}\nApple Inc;AAPL;DeGiro;;10;100\n"));

        assert_eq!(import.positions.len(), 0);
        assert_eq!(import.rejected.len(), 1);
        assert!(matches!(
            import.rejected[0].reason,
            RowError::BadNumber {
                field: "Average Buy Value",
                ..
            }
        ));
    }

    #[test]
    fn rejects_short_row_as_missing_field() {
        let import = parse(&format!("{HEADER}\nApple Inc;AAPL;DeGiro\n"));

        assert_eq!(import.positions.len(), 0);
        assert_eq!(import.rejected.len(), 1);
        assert!(matches!(
            import.rejected[0].reason,
            RowError::MissingField("Average Buy Value")
        ));
    }

    #[test]
    fn missing_required_column_fails_the_batch() {
        let err = parse_holdings("Name;ticker;Average Buy Value\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Broker"));
    }

    #[test]
    fn header_only_input_is_empty() {
        let import = parse(&format!("{HEADER}\n"));
        assert_eq!(import.positions.len(), 0);
        assert_eq!(import.rejected.len(), 0);
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let import = parse(
            "Broker;Total value;Name;Number of shares;ticker;Average Buy Value\nDeGiro;100;Apple Inc;2;AAPL;50\n",
        );

        assert_eq!(import.positions.len(), 1);
        let position = &import.positions[0];
        assert_eq!(position.broker, "DeGiro");
        assert_eq!(position.ticker, "AAPL");
        assert_eq!(position.average_buy_value, Decimal::from_str("50").unwrap());
    }
}
