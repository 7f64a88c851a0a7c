// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::FetchError;
use thiserror::Error;

/// 单个站点在一次监控中的失败原因
///
/// 只作为该站点的结果值返回，不会中断其他站点的处理
#[derive(Error, Debug)]
pub enum SiteError {
    /// 站点配置缺少URL或选择器等
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// 抓取在重试耗尽后仍然失败
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
}
