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

use crate::domain::models::site::SiteConfig;
use crate::engines::content_fetcher::FetcherConfig;
use crate::utils::retry_policy::RetryPolicy;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 站点列表文件的默认路径
pub const DEFAULT_WEBSITES_FILE: &str = "config/websites.yml";

/// 旧版本使用的站点列表路径环境变量，`SITEWATCH_CONFIG` 未设置时生效
pub const LEGACY_CONFIG_ENV: &str = "WEBSITE_TRACKER_CONFIG";

/// 应用程序配置设置
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 监控配置
    pub monitor: MonitorSettings,
    /// 抓取重试配置
    pub retry: RetrySettings,
    /// 指标导出配置
    #[serde(default)]
    pub metrics: MetricsSettings,
    /// 被监控的站点
    #[serde(default)]
    pub websites: Vec<SiteConfig>,
}

/// 监控配置设置
#[derive(Debug, Deserialize)]
pub struct MonitorSettings {
    /// 快照存放目录
    pub data_dir: String,
    /// 每个域名每分钟的请求上限
    pub requests_per_minute: usize,
    /// 同一域名两次请求之间的最小间隔（毫秒）
    pub min_request_interval_ms: u64,
    /// 请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 定时模式下两次检查的间隔（秒），未设置时只运行一次
    pub interval_secs: Option<u64>,
    /// 自定义请求头
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// 重试配置设置
#[derive(Debug, Deserialize)]
pub struct RetrySettings {
    /// 最大尝试次数（包含首次请求）
    pub max_attempts: u32,
    /// 初始退避时间（秒）
    pub initial_backoff_secs: u64,
    /// 最大退避时间（秒）
    pub max_backoff_secs: u64,
    /// 退避乘数
    pub backoff_multiplier: f64,
}

/// 指标配置设置
#[derive(Debug, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 导出监听地址，未设置时不导出
    pub listen_addr: Option<String>,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}`、
    /// 站点列表文件（`SITEWATCH_CONFIG` 或 `config/websites.yml`）
    /// 和 `SITEWATCH__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let websites_file = resolve_websites_file(
            std::env::var("SITEWATCH_CONFIG").ok(),
            std::env::var(LEGACY_CONFIG_ENV).ok(),
        );

        Self::with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::from(PathBuf::from(websites_file)).required(false))
            .add_source(Environment::with_prefix("SITEWATCH").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 只从指定文件加载配置（叠加在默认值之上）
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::with_defaults()?
            .add_source(File::from(path.as_ref()).required(true))
            .build()?
            .try_deserialize()
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("monitor.data_dir", "data")?
            .set_default("monitor.requests_per_minute", 30)?
            .set_default("monitor.min_request_interval_ms", 1000)?
            .set_default("monitor.request_timeout_secs", 30)?
            .set_default("retry.max_attempts", 3)?
            .set_default("retry.initial_backoff_secs", 4)?
            .set_default("retry.max_backoff_secs", 10)?
            .set_default("retry.backoff_multiplier", 2.0)
    }

    /// 由配置构造重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts.max(1),
            initial_backoff: Duration::from_secs(self.retry.initial_backoff_secs),
            max_backoff: Duration::from_secs(self.retry.max_backoff_secs),
            backoff_multiplier: self.retry.backoff_multiplier,
            ..RetryPolicy::default()
        }
    }

    /// 由配置构造抓取器配置
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: Duration::from_secs(self.monitor.request_timeout_secs),
            min_request_interval: Duration::from_millis(self.monitor.min_request_interval_ms),
            headers: self.monitor.headers.clone(),
            retry: self.retry_policy(),
        }
    }
}

/// 选择站点列表文件：`SITEWATCH_CONFIG` 优先，其次旧变量，最后默认路径
fn resolve_websites_file(primary: Option<String>, legacy: Option<String>) -> String {
    primary
        .or(legacy)
        .unwrap_or_else(|| DEFAULT_WEBSITES_FILE.to_string())
}
