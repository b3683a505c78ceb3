// src/storage/memory.rs
//! In-memory snapshot store for testing.

use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;

use super::SnapshotStore;
use crate::portfolio::PortfolioSnapshot;

/// In-memory store for testing purposes.
pub struct MemorySnapshotStore {
    snapshots: Mutex<HashMap<String, PortfolioSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self {
            snapshots: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn list_snapshot_names(&self) -> Result<Vec<String>> {
        let snapshots = self.snapshots.lock().await;
        let mut names: Vec<String> = snapshots.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn get_snapshot(&self, name: &str) -> Result<Option<PortfolioSnapshot>> {
        let snapshots = self.snapshots.lock().await;
        Ok(snapshots.get(name).cloned())
    }

    async fn save_snapshot(&self, snapshot: &PortfolioSnapshot) -> Result<()> {
        let mut snapshots = self.snapshots.lock().await;
        snapshots.insert(snapshot.name.clone(), snapshot.clone());
        Ok(())
    }

    async fn load_all_snapshots(&self) -> Result<Vec<PortfolioSnapshot>> {
        let snapshots = self.snapshots.lock().await;
        let mut all: Vec<PortfolioSnapshot> = snapshots.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}
