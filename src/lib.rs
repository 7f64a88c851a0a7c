// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置、站点列表和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、变更检测与监控服务以及快照仓库接口
pub mod domain;

/// 引擎模块
///
/// 实现网页抓取、内容提取和按域名限流
pub mod engines;

/// 基础设施模块
///
/// 提供快照持久化和指标导出等外部集成
pub mod infrastructure;

/// 工具模块
///
/// 提供重试策略、遥测和URL处理等通用功能
pub mod utils;
