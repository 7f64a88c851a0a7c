// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 测试主模块
///
/// 集成测试使用真实的抓取器、文件快照存储和本地模拟HTTP服务器
mod integration;
