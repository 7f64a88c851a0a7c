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

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// 抓取错误类型
#[derive(Error, Debug)]
pub enum FetchError {
    /// URL无法解析或缺少主机名
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// 网络失败或非2xx响应
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 抓取器已关闭
    #[error("Content fetcher is closed")]
    Closed,
}

impl FetchError {
    /// 判断错误是否值得重试
    ///
    /// 只有请求阶段的错误会重试；URL错误和已关闭状态重试也无济于事
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::RequestFailed(_))
    }
}

/// 一次成功抓取的结果
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedContent {
    /// 按选择器顺序拼接的规范化文本，每个匹配元素一行
    pub content: String,
    /// 解析完成时的时间戳
    pub timestamp: DateTime<Utc>,
}

/// 内容源特质
///
/// 监控器通过它获取站点内容，生产环境由 `ContentFetcher` 实现
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// 抓取URL并按选择器提取文本
    async fn fetch_content(
        &self,
        url: &str,
        selectors: &[String],
    ) -> Result<FetchedContent, FetchError>;

    /// 释放底层资源，可重复调用
    fn close(&self) {}

    /// 内容源名称
    fn name(&self) -> &'static str;
}
