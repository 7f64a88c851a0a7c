// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sitewatch::engines::content_fetcher::{ContentFetcher, FetcherConfig};
use sitewatch::engines::rate_limiter::RateLimiter;
use std::sync::Arc;
use std::time::Duration;

/// 测试用抓取器：最小间隔和退避都缩短到毫秒级
pub fn fast_fetcher() -> ContentFetcher {
    let mut config = FetcherConfig {
        timeout: Duration::from_secs(5),
        min_request_interval: Duration::from_millis(10),
        ..FetcherConfig::default()
    };
    config.retry.initial_backoff = Duration::from_millis(5);
    config.retry.max_backoff = Duration::from_millis(20);

    ContentFetcher::new(config, Arc::new(RateLimiter::default())).expect("build fetcher")
}

/// 由若干段落组成的HTML页面
pub fn page(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>", p))
        .collect();
    format!(
        "<html><head><style>p {{ margin: 0 }}</style></head><body>{}</body></html>",
        body
    )
}
