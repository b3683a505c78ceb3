use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tokio::fs;
use tracing::warn;

use super::SnapshotStore;
use crate::portfolio::PortfolioSnapshot;

/// JSON file-based snapshot store.
///
/// Directory structure:
/// ```text
/// data/
///   snapshots/
///     Statistics_2024-03-01_09-30-00.json
/// ```
pub struct JsonSnapshotStore {
    base_path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn snapshots_dir(&self) -> PathBuf {
        self.base_path.join("snapshots")
    }

    fn snapshot_file(&self, name: &str) -> Result<PathBuf> {
        if !is_safe_name(name) {
            bail!(
                "Invalid snapshot name {name:?}: names may only contain \
                 ASCII letters, digits, '-' and '_'"
            );
        }
        Ok(self.snapshots_dir().join(format!("{name}.json")))
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create directory")?;
        }
        Ok(())
    }

    async fn read_json<T: for<'de> serde::Deserialize<'de>>(
        &self,
        path: &Path,
    ) -> Result<Option<T>> {
        match fs::read_to_string(path).await {
            Ok(content) => {
                let value = serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read file"),
        }
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        self.ensure_dir(path).await?;
        let content = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
        fs::write(path, content)
            .await
            .context("Failed to write file")?;
        Ok(())
    }
}

/// Snapshot names become file names, so only a narrow character set is
/// accepted.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait::async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn list_snapshot_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        let mut entries = match fs::read_dir(&self.snapshots_dir()).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e).context("Failed to read directory"),
        };

        while let Some(entry) = entries.next_entry().await.context("Failed to read entry")? {
            if let Ok(file_type) = entry.file_type().await {
                if file_type.is_file() {
                    if let Some(file_name) = entry.file_name().to_str() {
                        if let Some(name) = file_name.strip_suffix(".json") {
                            if is_safe_name(name) {
                                names.push(name.to_string());
                            }
                        }
                    }
                }
            }
        }

        names.sort();
        Ok(names)
    }

    async fn get_snapshot(&self, name: &str) -> Result<Option<PortfolioSnapshot>> {
        self.read_json(&self.snapshot_file(name)?).await
    }

    async fn save_snapshot(&self, snapshot: &PortfolioSnapshot) -> Result<()> {
        self.write_json(&self.snapshot_file(&snapshot.name)?, snapshot)
            .await
    }

    async fn load_all_snapshots(&self) -> Result<Vec<PortfolioSnapshot>> {
        let mut snapshots = Vec::new();

        for name in self.list_snapshot_names().await? {
            match self
                .read_json::<PortfolioSnapshot>(&self.snapshot_file(&name)?)
                .await
            {
                Ok(Some(snapshot)) => snapshots.push(snapshot),
                Ok(None) => {}
                Err(e) => {
                    warn!(name = %name, error = %e, "Skipping unreadable snapshot file");
                }
            }
        }

        Ok(snapshots)
    }
}
