mod generate;
mod history;
mod list;
mod types;

pub use generate::generate_snapshot;
pub use history::{monthly_history, snapshot_trend};
pub use list::list_snapshots;
pub use types::{
    GenerateOutput, HistoryOutput, MonthPoint, SnapshotListItem, TrendOutput, TrendPoint,
};
