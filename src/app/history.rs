use anyhow::Result;

use crate::portfolio::{reduce_monthly, sort_chronological, MonthKey};
use crate::storage::SnapshotStore;

use super::{HistoryOutput, MonthPoint, TrendOutput, TrendPoint};

/// Monthly history: the latest snapshot of each month, oldest month first.
pub async fn monthly_history(store: &dyn SnapshotStore) -> Result<HistoryOutput> {
    let snapshots = store.load_all_snapshots().await?;
    let reduced = reduce_monthly(snapshots)?;

    let mut months: Vec<(MonthKey, _)> = reduced.into_iter().collect();
    months.sort_by_key(|(key, _)| *key);

    let months = months
        .into_iter()
        .map(|(key, snapshot)| MonthPoint {
            month: key.to_string(),
            snapshot_name: snapshot.name,
            total_portfolio_value: snapshot.total_portfolio_value,
            total_invested_funds: snapshot.total_invested_funds,
            total_win: snapshot.total_win,
            total_loss: snapshot.total_loss,
            total_profit: snapshot.total_profit,
        })
        .collect();

    Ok(HistoryOutput { months })
}

/// Every stored snapshot in chronological order.
pub async fn snapshot_trend(store: &dyn SnapshotStore) -> Result<TrendOutput> {
    let snapshots = store.load_all_snapshots().await?;

    let mut points = Vec::new();
    for snapshot in sort_chronological(snapshots)? {
        let timestamp = snapshot.timestamp()?.to_rfc3339();
        points.push(TrendPoint {
            name: snapshot.name,
            timestamp,
            total_portfolio_value: snapshot.total_portfolio_value,
            total_profit: snapshot.total_profit,
        });
    }

    Ok(TrendOutput { points })
}
