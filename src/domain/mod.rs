// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：站点配置、快照和变更报告
/// - 仓库接口（repositories）：快照持久化抽象接口
/// - 服务（services）：内容提取、变更检测和监控编排
///
/// 领域层不依赖于具体的存储或HTTP实现，
/// 这些由引擎层和基础设施层通过特质注入。
pub mod models;
pub mod repositories;
pub mod services;
