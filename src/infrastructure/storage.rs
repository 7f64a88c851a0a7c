// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::models::snapshot::Snapshot;
use crate::domain::repositories::snapshot_repository::{snapshot_key, SnapshotStore, StorageError};

/// 本地文件系统快照存储
///
/// 每个站点一个 `<key>.json` 文件，内容为 `{content, timestamp}`
pub struct JsonFileSnapshotStore {
    base_path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// 站点快照文件的完整路径
    pub fn path_for(&self, site_name: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.json", snapshot_key(site_name)))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self, site_name: &str) -> Result<Option<Snapshot>, StorageError> {
        let full_path = self.path_for(site_name);

        let data = match fs::read(&full_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: snapshot_key(site_name),
                source,
            })
    }

    async fn save(&self, site_name: &str, snapshot: &Snapshot) -> Result<(), StorageError> {
        let full_path = self.path_for(site_name);
        let data = serde_json::to_vec_pretty(snapshot)?;

        // 确保目录存在
        fs::create_dir_all(&self.base_path).await?;

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        debug!(site = site_name, path = %full_path.display(), "Snapshot saved");
        Ok(())
    }
}

/// 内存快照存储（用于测试和不需要持久化的场景）
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    data: Arc<RwLock<HashMap<String, Snapshot>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前保存的快照数量
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self, site_name: &str) -> Result<Option<Snapshot>, StorageError> {
        let map = self.data.read().await;
        Ok(map.get(&snapshot_key(site_name)).cloned())
    }

    async fn save(&self, site_name: &str, snapshot: &Snapshot) -> Result<(), StorageError> {
        let mut map = self.data.write().await;
        map.insert(snapshot_key(site_name), snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot(content: &str) -> Snapshot {
        Snapshot::new(content, Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path());

        assert!(store.load("Example").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("data"));

        store.save("My Site", &snapshot("Hello\nWorld")).await.unwrap();

        let path = dir.path().join("data").join("my_site.json");
        assert_eq!(store.path_for("My Site"), path);
        assert!(path.exists());

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["content"], "Hello\nWorld");
        assert_eq!(raw["timestamp"], "2024-01-01T12:00:00Z");

        let loaded = store.load("My Site").await.unwrap();
        assert_eq!(loaded, Some(snapshot("Hello\nWorld")));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path());

        store.save("Example", &snapshot("first")).await.unwrap();
        store.save("Example", &snapshot("second")).await.unwrap();

        let loaded = store.load("Example").await.unwrap().unwrap();
        assert_eq!(loaded.content, "second");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path());
        std::fs::write(dir.path().join("example.json"), b"{not json").unwrap();

        let result = store.load("Example").await;
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn test_save_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"i am a file").unwrap();
        let store = JsonFileSnapshotStore::new(&blocker);

        let result = store.save("Example", &snapshot("x")).await;
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[tokio::test]
    async fn test_in_memory_store_uses_normalized_key() {
        let store = InMemorySnapshotStore::new();
        assert!(store.is_empty().await);

        store.save("My Site", &snapshot("a")).await.unwrap();
        store.save("my site", &snapshot("b")).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.load("MY SITE").await.unwrap().unwrap().content, "b");
    }
}
