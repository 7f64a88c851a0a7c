// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::snapshot::Snapshot;
use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 记录存在但无法解析
    #[error("Corrupt snapshot '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// 序列化失败
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 由站点名称推导存储键：小写，空格替换为下划线
pub fn snapshot_key(site_name: &str) -> String {
    site_name.to_lowercase().replace(' ', "_")
}

/// 快照仓库特质
///
/// 每个站点名称对应一条记录，保存时整体覆盖
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// 读取站点的上一次快照，不存在时返回 `Ok(None)`
    async fn load(&self, site_name: &str) -> Result<Option<Snapshot>, StorageError>;

    /// 保存站点的当前快照
    async fn save(&self, site_name: &str, snapshot: &Snapshot) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_key_normalizes_case_and_spaces() {
        assert_eq!(snapshot_key("Example"), "example");
        assert_eq!(snapshot_key("My Favourite Site"), "my_favourite_site");
        assert_eq!(snapshot_key("already_ok"), "already_ok");
    }
}
