mod support;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use foliostat::app;
use foliostat::storage::{JsonSnapshotStore, SnapshotStore};
use tempfile::TempDir;

#[tokio::test]
async fn monthly_history_over_json_store() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonSnapshotStore::new(dir.path());

    store
        .save_snapshot(&support::snapshot("Statistics_2024-03-01_09-00-00", "100.00"))
        .await?;
    store
        .save_snapshot(&support::snapshot("Statistics_2024-03-20_18-00-00", "200.00"))
        .await?;
    store
        .save_snapshot(&support::snapshot("Statistics_2024-04-02_09-00-00", "300.00"))
        .await?;

    let history = app::monthly_history(&store).await?;
    assert_eq!(history.months.len(), 2);

    assert_eq!(history.months[0].month, "2024-03");
    assert_eq!(
        history.months[0].snapshot_name,
        "Statistics_2024-03-20_18-00-00"
    );
    assert_eq!(history.months[0].total_portfolio_value, "200.00");

    assert_eq!(history.months[1].month, "2024-04");
    assert_eq!(history.months[1].total_portfolio_value, "300.00");

    Ok(())
}

#[tokio::test]
async fn history_survives_unreadable_snapshot_files() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonSnapshotStore::new(dir.path());

    store
        .save_snapshot(&support::snapshot("Statistics_2024-03-01_09-00-00", "100.00"))
        .await?;

    std::fs::write(
        dir.path()
            .join("snapshots")
            .join("Statistics_2024-05-01_00-00-00.json"),
        "{not valid json",
    )?;

    let history = app::monthly_history(&store).await?;
    assert_eq!(history.months.len(), 1);
    assert_eq!(history.months[0].month, "2024-03");

    Ok(())
}

#[tokio::test]
async fn history_fails_on_uninterpretable_snapshot_name() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonSnapshotStore::new(dir.path());

    store
        .save_snapshot(&support::snapshot("Statistics_2024-03-01_09-00-00", "100.00"))
        .await?;
    store
        .save_snapshot(&support::snapshot("Imported_2020", "50.00"))
        .await?;

    assert!(app::monthly_history(&store).await.is_err());

    Ok(())
}

#[tokio::test]
async fn trend_orders_by_recorded_time_over_name() -> Result<()> {
    let dir = TempDir::new()?;
    let store = JsonSnapshotStore::new(dir.path());

    store
        .save_snapshot(&support::snapshot("Statistics_2024-03-20_09-00-00", "100.00"))
        .await?;

    // Recorded generation time wins over the one encoded in the name.
    let mut backfilled = support::snapshot("Statistics_2024-03-25_09-00-00", "50.00");
    backfilled.generated_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    store.save_snapshot(&backfilled).await?;

    let trend = app::snapshot_trend(&store).await?;
    assert_eq!(trend.points.len(), 2);
    assert_eq!(trend.points[0].name, "Statistics_2024-03-25_09-00-00");
    assert_eq!(trend.points[0].timestamp, "2024-02-01T00:00:00+00:00");
    assert_eq!(trend.points[1].name, "Statistics_2024-03-20_09-00-00");

    Ok(())
}
