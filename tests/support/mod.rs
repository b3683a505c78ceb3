use std::collections::BTreeMap;

use foliostat::portfolio::PortfolioSnapshot;

/// Builds a minimal snapshot record for storage and history tests.
pub fn snapshot(name: &str, total_portfolio_value: &str) -> PortfolioSnapshot {
    PortfolioSnapshot {
        name: name.to_string(),
        generated_at: None,
        total_portfolio_value: total_portfolio_value.to_string(),
        total_invested_funds: "0.00".to_string(),
        total_win: "0.00".to_string(),
        total_profit: "0.00".to_string(),
        total_loss: "0.00".to_string(),
        by_broker: BTreeMap::new(),
    }
}
