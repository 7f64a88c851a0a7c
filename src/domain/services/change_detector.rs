// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::change_report::ChangeReport;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// 变更检测器
///
/// 把两份内容按行拆成集合后做差集。重复行会合并，行序不参与比较；
/// 被修改的行表现为一条删除加一条新增。
pub struct ChangeDetector;

impl ChangeDetector {
    /// 比较前后两次内容，生成变更报告
    pub fn detect(
        site_name: &str,
        previous_content: &str,
        current_content: &str,
        previous_timestamp: DateTime<Utc>,
        current_timestamp: DateTime<Utc>,
    ) -> ChangeReport {
        let previous: BTreeSet<&str> = previous_content.lines().collect();
        let current: BTreeSet<&str> = current_content.lines().collect();

        let added: BTreeSet<String> = current
            .difference(&previous)
            .map(|line| line.to_string())
            .collect();
        let removed: BTreeSet<String> = previous
            .difference(&current)
            .map(|line| line.to_string())
            .collect();

        let total_lines = previous.union(&current).count();
        let changed_lines = added.len() + removed.len();
        let change_percentage = if total_lines > 0 {
            round2(changed_lines as f64 / total_lines as f64 * 100.0)
        } else {
            0.0
        };

        ChangeReport {
            website: site_name.to_string(),
            timestamp: current_timestamp,
            previous_check: previous_timestamp,
            changes: !added.is_empty() || !removed.is_empty(),
            added,
            removed,
            change_percentage,
        }
    }
}

// Rounds the exact binary value; ties go to the even digit.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
