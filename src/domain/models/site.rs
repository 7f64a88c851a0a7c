// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::SiteError;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_site_name() -> String {
    "Unknown".to_string()
}

/// 被监控站点的配置
///
/// `name` 同时作为快照的存储键，在配置中应保持唯一
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate)]
pub struct SiteConfig {
    /// 站点名称
    #[serde(default = "default_site_name")]
    pub name: String,
    /// 页面URL
    #[validate(required(message = "url is required"), url(message = "url is not valid"))]
    #[serde(default)]
    pub url: Option<String>,
    /// 内容提取配置
    #[validate(nested)]
    #[serde(default)]
    pub content: ContentSettings,
}

/// 内容提取配置
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, Validate)]
pub struct ContentSettings {
    /// 按顺序应用的CSS选择器
    #[validate(length(min = 1, message = "at least one selector is required"))]
    #[serde(default)]
    pub selectors: Vec<String>,
}

/// 通过校验的站点抓取目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteTarget<'a> {
    pub name: &'a str,
    pub url: &'a str,
    pub selectors: &'a [String],
}

impl SiteConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>, selectors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
            content: ContentSettings { selectors },
        }
    }

    /// 校验配置并返回抓取目标
    ///
    /// # Returns
    ///
    /// * `Ok(SiteTarget)` - URL和选择器都有效
    /// * `Err(SiteError::InvalidConfig)` - 缺少URL、URL无效或没有选择器
    pub fn target(&self) -> Result<SiteTarget<'_>, SiteError> {
        self.validate().map_err(|e| {
            SiteError::InvalidConfig(format!("website '{}': {}", self.name, e))
        })?;

        let url = self.url.as_deref().ok_or_else(|| {
            SiteError::InvalidConfig(format!("website '{}': url is required", self.name))
        })?;

        Ok(SiteTarget {
            name: &self.name,
            url,
            selectors: &self.content.selectors,
        })
    }
}
