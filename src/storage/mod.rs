mod json_file;
mod memory;

pub use json_file::JsonSnapshotStore;
pub use memory::MemorySnapshotStore;

use anyhow::Result;

use crate::portfolio::PortfolioSnapshot;

/// Storage trait for persisting portfolio snapshots.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Names of all stored snapshots, sorted ascending.
    async fn list_snapshot_names(&self) -> Result<Vec<String>>;
    async fn get_snapshot(&self, name: &str) -> Result<Option<PortfolioSnapshot>>;
    /// Persists a snapshot, overwriting any record with the same name.
    async fn save_snapshot(&self, snapshot: &PortfolioSnapshot) -> Result<()>;
    /// Loads every readable snapshot, in name order.
    async fn load_all_snapshots(&self) -> Result<Vec<PortfolioSnapshot>>;
}
