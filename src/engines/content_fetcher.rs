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

use crate::domain::services::extraction_service::ExtractionService;
use crate::engines::rate_limiter::RateLimiter;
use crate::engines::traits::{ContentSource, FetchError, FetchedContent};
use crate::utils::retry_policy::{RetryPolicy, Sleeper, TokioSleeper};
use crate::utils::url_utils::domain_of;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, warn};
use url::Url;

/// 默认的浏览器 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 抓取器配置
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// 单次请求超时时间
    pub timeout: Duration,
    /// 同一域名两次请求之间的最小间隔
    pub min_request_interval: Duration,
    /// 自定义请求头；包含 User-Agent 时替换默认值
    pub headers: HashMap<String, String>,
    /// 重试策略
    pub retry: RetryPolicy,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            min_request_interval: Duration::from_secs(1),
            headers: HashMap::new(),
            retry: RetryPolicy::standard(),
        }
    }
}

/// 内容抓取器
///
/// 基于reqwest实现，带重试退避、按域名限流和最小请求间隔。
/// 节流通过睡眠阻塞调用方任务，需要取消时由调用方在外层套超时。
pub struct ContentFetcher {
    /// HTTP客户端，关闭后为 `None`
    client: Mutex<Option<reqwest::Client>>,
    /// 每分钟请求数限流
    rate_limiter: Arc<RateLimiter>,
    /// 退避与节流使用的睡眠实现
    sleeper: Arc<dyn Sleeper>,
    retry: RetryPolicy,
    min_request_interval: Duration,
    /// 域名 -> 上一次请求时间
    last_request: Mutex<HashMap<String, Instant>>,
}

impl ContentFetcher {
    /// 创建新的抓取器
    ///
    /// # 参数
    ///
    /// * `config` - 抓取器配置
    /// * `rate_limiter` - 共享的按域名限流器
    ///
    /// # 返回值
    ///
    /// * `Ok(ContentFetcher)` - 抓取器
    /// * `Err(FetchError)` - HTTP客户端构建失败
    pub fn new(config: FetcherConfig, rate_limiter: Arc<RateLimiter>) -> Result<Self, FetchError> {
        let client = build_client(&config)?;

        Ok(Self {
            client: Mutex::new(Some(client)),
            rate_limiter,
            sleeper: Arc::new(TokioSleeper),
            retry: config.retry,
            min_request_interval: config.min_request_interval,
            last_request: Mutex::new(HashMap::new()),
        })
    }

    /// 替换睡眠实现
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// 抓取页面并提取文本
    ///
    /// # 参数
    ///
    /// * `url` - 页面URL
    /// * `selectors` - 按顺序应用的CSS选择器
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedContent)` - 提取的文本与时间戳
    /// * `Err(FetchError)` - URL无效、抓取器已关闭，或重试耗尽后的最后一次错误
    pub async fn fetch_content(
        &self,
        url: &str,
        selectors: &[String],
    ) -> Result<FetchedContent, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let domain = domain_of(&parsed).ok_or_else(|| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        })?;
        let client = self.client.lock().clone().ok_or(FetchError::Closed)?;

        let start = std::time::Instant::now();
        let (client_ref, url_ref, domain_ref) = (&client, &parsed, domain.as_str());
        let result = self
            .retry
            .run_if(self.sleeper.as_ref(), FetchError::is_retryable, move |attempt| async move {
                self.fetch_once(client_ref, url_ref, domain_ref, attempt).await
            })
            .await;
        metrics::histogram!("sitewatch_fetch_duration_seconds").record(start.elapsed().as_secs_f64());

        let body = match result {
            Ok(body) => body,
            Err(e) => {
                error!(url, error = %e, "Error fetching content");
                return Err(e);
            }
        };

        let content = ExtractionService::extract_text(&body, selectors);
        let timestamp = Utc::now();
        debug!(
            url,
            lines = content.lines().count(),
            "Content extracted"
        );

        Ok(FetchedContent { content, timestamp })
    }

    /// 释放连接池，可重复调用
    pub fn close(&self) {
        if self.client.lock().take().is_some() {
            debug!("Content fetcher closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client.lock().is_none()
    }

    async fn fetch_once(
        &self,
        client: &reqwest::Client,
        url: &Url,
        domain: &str,
        attempt: u32,
    ) -> Result<String, FetchError> {
        self.throttle(domain).await;

        debug!(url = %url, domain, attempt, "Fetching page");
        let response = client.get(url.clone()).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    /// 等待域名的请求配额和最小间隔
    async fn throttle(&self, domain: &str) {
        // One wait covers the window; the slot is then claimed without rechecking.
        if let Err(wait) = self.rate_limiter.try_acquire(domain) {
            debug!(domain, wait_ms = wait.as_millis() as u64, "Rate limit reached, waiting");
            self.sleeper.sleep(wait).await;
            self.rate_limiter.add_request(domain);
        }

        let delay = {
            let last_request = self.last_request.lock();
            last_request.get(domain).and_then(|previous| {
                self.min_request_interval
                    .checked_sub(previous.elapsed())
                    .filter(|remaining| !remaining.is_zero())
            })
        };

        if let Some(delay) = delay {
            debug!(domain, delay_ms = delay.as_millis() as u64, "Spacing requests to domain");
            self.sleeper.sleep(delay).await;
        }

        self.last_request
            .lock()
            .insert(domain.to_string(), Instant::now());
    }
}

#[async_trait]
impl ContentSource for ContentFetcher {
    async fn fetch_content(
        &self,
        url: &str,
        selectors: &[String],
    ) -> Result<FetchedContent, FetchError> {
        ContentFetcher::fetch_content(self, url, selectors).await
    }

    fn close(&self) {
        ContentFetcher::close(self);
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

fn build_client(config: &FetcherConfig) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    for (k, v) in &config.headers {
        match (
            HeaderName::from_bytes(k.as_bytes()),
            HeaderValue::from_str(v),
        ) {
            (Ok(k), Ok(v)) => {
                headers.insert(k, v);
            }
            _ => warn!(header = %k, "Ignoring invalid request header"),
        }
    }

    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .default_headers(headers);

    if !config
        .headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case("user-agent"))
    {
        builder = builder.user_agent(DEFAULT_USER_AGENT);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
#[path = "content_fetcher_test.rs"]
mod tests;
