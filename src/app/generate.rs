use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::clock::Clock;
use crate::holdings::parse_holdings;
use crate::market_data::{resolve_prices, QuoteProvider};
use crate::portfolio::aggregate;
use crate::storage::SnapshotStore;

use super::GenerateOutput;

/// Parses a holdings export, prices it, and persists the aggregated
/// snapshot.
pub async fn generate_snapshot(
    store: &dyn SnapshotStore,
    provider: &dyn QuoteProvider,
    clock: &dyn Clock,
    holdings_path: &Path,
) -> Result<GenerateOutput> {
    let content = tokio::fs::read_to_string(holdings_path)
        .await
        .with_context(|| format!("Failed to read holdings from {:?}", holdings_path))?;

    let import = parse_holdings(content.as_bytes())?;
    for rejected in &import.rejected {
        warn!(
            record = rejected.record,
            reason = %rejected.reason,
            "Rejected holdings row"
        );
    }

    let prices = resolve_prices(
        provider,
        import.positions.iter().map(|p| p.ticker.as_str()),
    )
    .await;

    let snapshot = aggregate(&import.positions, &prices, clock.now())?;
    store.save_snapshot(&snapshot).await?;
    info!(name = %snapshot.name, "Saved portfolio snapshot");

    // Distinct tickers without a price, in first-seen order.
    let mut unpriced_tickers: Vec<String> = Vec::new();
    for position in &import.positions {
        if !prices.contains_key(&position.ticker) && !unpriced_tickers.contains(&position.ticker) {
            unpriced_tickers.push(position.ticker.clone());
        }
    }

    let priced_positions = import
        .positions
        .iter()
        .filter(|p| prices.contains_key(&p.ticker))
        .count();

    Ok(GenerateOutput {
        name: snapshot.name.clone(),
        generated_at: snapshot
            .generated_at
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default(),
        positions: import.positions.len(),
        rejected_rows: import.rejected.len(),
        priced_positions,
        unpriced_tickers,
        brokers: snapshot.by_broker.len(),
        total_portfolio_value: snapshot.total_portfolio_value.clone(),
        total_invested_funds: snapshot.total_invested_funds.clone(),
        total_profit: snapshot.total_profit.clone(),
    })
}
