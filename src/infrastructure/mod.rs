// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 指标（metrics）：Prometheus 指标导出与指标描述
/// - 存储（storage）：快照仓库接口的文件和内存实现
pub mod metrics;
pub mod storage;
