// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动 Prometheus 指标导出并注册指标描述
///
/// 地址无效或端口被占用时只记录警告，监控流程照常运行
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(listen_addr, error = %e, "Invalid metrics listen address, exporter disabled");
            return;
        }
    };

    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
}

fn describe_metrics() {
    describe_counter!(
        "sitewatch_sites_checked_total",
        "Total number of site checks attempted"
    );
    describe_counter!(
        "sitewatch_site_failures_total",
        "Total number of site checks that failed"
    );
    describe_counter!(
        "sitewatch_changes_detected_total",
        "Total number of site checks that reported changes"
    );
    describe_counter!(
        "sitewatch_fetch_retries_total",
        "Total number of fetch attempts that were retried"
    );
    describe_histogram!(
        "sitewatch_fetch_duration_seconds",
        "Duration of page fetches including retries, in seconds"
    );
}
