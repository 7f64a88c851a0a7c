// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::change_report::ChangeReport;
use crate::domain::models::site::SiteConfig;
use crate::domain::models::snapshot::Snapshot;
use crate::domain::repositories::snapshot_repository::SnapshotStore;
use crate::domain::services::change_detector::ChangeDetector;
use crate::engines::traits::ContentSource;
use crate::utils::errors::SiteError;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 单个站点一次检查的结果
#[derive(Debug)]
pub enum SiteStatus {
    /// 内容与上一次快照不同
    Changed(ChangeReport),
    /// 内容与上一次快照相同
    Unchanged,
    /// 首次观察，只保存了基线快照
    Baseline,
    /// 检查失败，站点被跳过
    Failed(SiteError),
}

/// 站点名称与检查结果
#[derive(Debug)]
pub struct SiteOutcome {
    pub site: String,
    pub status: SiteStatus,
}

/// 一次完整监控的结果，每个配置的站点对应一项
#[derive(Debug, Default)]
pub struct MonitorRun {
    pub outcomes: Vec<SiteOutcome>,
}

impl MonitorRun {
    /// 检测到变更的报告
    pub fn changes(&self) -> impl Iterator<Item = &ChangeReport> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.status {
            SiteStatus::Changed(report) => Some(report),
            _ => None,
        })
    }

    pub fn into_changes(self) -> Vec<ChangeReport> {
        self.outcomes
            .into_iter()
            .filter_map(|outcome| match outcome.status {
                SiteStatus::Changed(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    /// 失败的站点数量
    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, SiteStatus::Failed(_)))
            .count()
    }
}

/// 网站监控器
///
/// 依次检查每个配置的站点：抓取、读取上一次快照、保存当前快照、比较差异。
/// 单个站点的失败只体现在它自己的结果里，不会影响其他站点。
pub struct Monitor {
    source: Arc<dyn ContentSource>,
    store: Arc<dyn SnapshotStore>,
    sites: Vec<SiteConfig>,
}

impl Monitor {
    pub fn new(
        source: Arc<dyn ContentSource>,
        store: Arc<dyn SnapshotStore>,
        sites: Vec<SiteConfig>,
    ) -> Self {
        Self {
            source,
            store,
            sites,
        }
    }

    /// 对所有站点执行一次检查
    pub async fn run(&self) -> MonitorRun {
        if self.sites.is_empty() {
            warn!("No websites configured for monitoring");
            return MonitorRun::default();
        }

        let mut outcomes = Vec::with_capacity(self.sites.len());
        for site in &self.sites {
            let status = self.check_site(site).await;
            outcomes.push(SiteOutcome {
                site: site.name.clone(),
                status,
            });
        }

        let run = MonitorRun { outcomes };
        info!(
            source = self.source.name(),
            sites = run.outcomes.len(),
            changed = run.changes().count(),
            failed = run.failure_count(),
            "Monitoring pass completed"
        );
        run
    }

    /// 执行一次检查，只返回有变更的报告
    pub async fn start_monitoring(&self) -> Vec<ChangeReport> {
        self.run().await.into_changes()
    }

    /// 检查单个站点
    pub async fn check_site(&self, site: &SiteConfig) -> SiteStatus {
        counter!("sitewatch_sites_checked_total").increment(1);

        match self.try_check_site(site).await {
            Ok(status) => status,
            Err(e) => {
                error!(site = %site.name, error = %e, "Error monitoring website");
                counter!("sitewatch_site_failures_total").increment(1);
                SiteStatus::Failed(e)
            }
        }
    }

    async fn try_check_site(&self, site: &SiteConfig) -> Result<SiteStatus, SiteError> {
        let target = site.target()?;

        let fetched = self
            .source
            .fetch_content(target.url, target.selectors)
            .await?;

        let previous = match self.store.load(target.name).await {
            Ok(previous) => previous,
            Err(e) => {
                warn!(site = target.name, error = %e, "Error loading previous content, treating as first observation");
                None
            }
        };

        let current = Snapshot::new(fetched.content, fetched.timestamp);
        if let Err(e) = self.store.save(target.name, &current).await {
            error!(site = target.name, error = %e, "Error saving content");
        }

        let Some(previous) = previous else {
            info!(site = target.name, "Initial content saved");
            return Ok(SiteStatus::Baseline);
        };

        let report = ChangeDetector::detect(
            target.name,
            &previous.content,
            &current.content,
            previous.timestamp,
            current.timestamp,
        );

        if report.changes {
            counter!("sitewatch_changes_detected_total").increment(1);
            info!(
                site = target.name,
                added = report.added.len(),
                removed = report.removed.len(),
                change_percentage = report.change_percentage,
                "Changes detected"
            );
            Ok(SiteStatus::Changed(report))
        } else {
            debug!(site = target.name, "No changes");
            Ok(SiteStatus::Unchanged)
        }
    }

    /// 释放内容源持有的资源
    pub fn close(&self) {
        self.source.close();
    }
}

#[cfg(test)]
#[path = "monitor_test.rs"]
mod tests;
