// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 站点（site）：被监控页面的配置与校验
/// - 快照（snapshot）：站点最近一次成功抓取的内容
/// - 变更报告（change_report）：两次快照之间的差异
pub mod change_report;
pub mod site;
pub mod snapshot;
