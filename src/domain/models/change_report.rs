// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 变更报告
///
/// 比较同一站点前后两次快照得到，只返回给调用方，不做持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    /// 站点名称
    pub website: String,
    /// 本次抓取时间
    pub timestamp: DateTime<Utc>,
    /// 上一次快照的时间
    pub previous_check: DateTime<Utc>,
    /// 是否存在新增或删除的行
    pub changes: bool,
    /// 新增的行
    pub added: BTreeSet<String>,
    /// 删除的行
    pub removed: BTreeSet<String>,
    /// 变更幅度（百分比，保留两位小数）
    pub change_percentage: f64,
}
