// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 变更检测（change_detector）：比较前后两次快照的行集合
/// - 提取服务（extraction_service）：按CSS选择器提取可见文本
/// - 监控服务（monitor）：编排抓取、快照读写和变更检测
pub mod change_detector;
pub mod extraction_service;
pub mod monitor;
