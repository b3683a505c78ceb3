use anyhow::Result;

use crate::portfolio::parse_generation_name;
use crate::storage::SnapshotStore;

use super::SnapshotListItem;

pub async fn list_snapshots(store: &dyn SnapshotStore) -> Result<Vec<SnapshotListItem>> {
    let names = store.list_snapshot_names().await?;
    let mut output = Vec::new();

    for name in names {
        // Records written by other tooling may not embed a timestamp.
        let timestamp = parse_generation_name(&name)
            .ok()
            .map(|ts| ts.and_utc().to_rfc3339());
        output.push(SnapshotListItem { name, timestamp });
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::PortfolioSnapshot;
    use crate::storage::MemorySnapshotStore;
    use std::collections::BTreeMap;

    fn snapshot(name: &str) -> PortfolioSnapshot {
        PortfolioSnapshot {
            name: name.to_string(),
            generated_at: None,
            total_portfolio_value: "0.00".to_string(),
            total_invested_funds: "0.00".to_string(),
            total_win: "0.00".to_string(),
            total_profit: "0.00".to_string(),
            total_loss: "0.00".to_string(),
            by_broker: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn list_snapshots_includes_timestamp_when_parseable() -> Result<()> {
        let store = MemorySnapshotStore::new();
        store
            .save_snapshot(&snapshot("Statistics_2024-03-01_09-30-00"))
            .await?;
        store.save_snapshot(&snapshot("Imported_2020")).await?;

        let out = list_snapshots(&store).await?;
        assert_eq!(out.len(), 2);

        assert_eq!(out[0].name, "Imported_2020");
        assert_eq!(out[0].timestamp, None);

        assert_eq!(out[1].name, "Statistics_2024-03-01_09-30-00");
        assert_eq!(
            out[1].timestamp.as_deref(),
            Some("2024-03-01T09:30:00+00:00")
        );
        Ok(())
    }
}
