use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One brokerage holding, decoded from an input row.
///
/// Numeric fields are parsed before construction; a row that fails to parse
/// never becomes a `Position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Display label for the holding.
    pub name: String,

    /// Exchange symbol; key into the quote provider.
    pub ticker: String,

    /// Grouping key; free-form.
    pub broker: String,

    /// Cost basis per share.
    pub average_buy_value: Decimal,

    pub number_of_shares: Decimal,

    /// Total value as declared by the source row. May diverge from the
    /// computed value; carried through unmodified for display.
    pub total_value_declared: Decimal,
}
