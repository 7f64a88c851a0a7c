// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Context;
use sitewatch::config::settings::Settings;
use sitewatch::domain::services::monitor::{Monitor, MonitorRun};
use sitewatch::engines::content_fetcher::ContentFetcher;
use sitewatch::engines::rate_limiter::RateLimiter;
use sitewatch::infrastructure::metrics::init_metrics;
use sitewatch::infrastructure::storage::JsonFileSnapshotStore;
use sitewatch::utils::telemetry::{self, LogFormat};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// 主函数
///
/// 初始化日志后运行监控；配置加载失败或其他未处理错误时以失败状态退出
#[tokio::main]
async fn main() -> ExitCode {
    // 1. Initialize logging
    telemetry::init_telemetry(LogFormat::from_env());
    info!("Starting website content tracker");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error running website tracker: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // 2. Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    info!(sites = settings.websites.len(), "Configuration loaded");

    if let Some(addr) = &settings.metrics.listen_addr {
        init_metrics(addr);
    }

    // 3. Build components
    let rate_limiter = Arc::new(RateLimiter::new(settings.monitor.requests_per_minute));
    let fetcher = ContentFetcher::new(settings.fetcher_config(), rate_limiter)
        .context("Failed to build HTTP client")?;
    let store = JsonFileSnapshotStore::new(&settings.monitor.data_dir);
    let interval = settings
        .monitor
        .interval_secs
        .map(|secs| Duration::from_secs(secs.max(1)));

    let monitor = Monitor::new(Arc::new(fetcher), Arc::new(store), settings.websites);

    // 4. Run once, or on a fixed interval until interrupted
    let result = match interval {
        None => {
            report_changes(&monitor.run().await);
            Ok(())
        }
        Some(every) => run_scheduled(&monitor, every).await,
    };

    monitor.close();
    result
}

async fn run_scheduled(monitor: &Monitor, every: Duration) -> anyhow::Result<()> {
    info!(interval_secs = every.as_secs(), "Running in scheduled mode");
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                report_changes(&monitor.run().await);
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for shutdown signal")?;
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }
}

fn report_changes(run: &MonitorRun) {
    let changes: Vec<_> = run.changes().collect();
    if changes.is_empty() {
        info!("No changes detected in any monitored websites");
        return;
    }

    info!("Detected changes in {} websites:", changes.len());
    for change in changes {
        info!("Changes for {}:", change.website);
        info!("Time: {}", change.timestamp.to_rfc3339());
        info!("Change percentage: {}%", change.change_percentage);

        if !change.added.is_empty() {
            info!("Added content:");
            for item in &change.added {
                info!("+ {}", item);
            }
        }

        if !change.removed.is_empty() {
            info!("Removed content:");
            for item in &change.removed {
                info!("- {}", item);
            }
        }
    }
}
