// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// 滑动窗口长度
const WINDOW: Duration = Duration::from_secs(60);

/// 默认每分钟每域名请求数上限
pub const DEFAULT_REQUESTS_PER_MINUTE: usize = 30;

/// 按域名的滑动窗口限流器
///
/// 每个域名记录最近一分钟内的请求时间戳，过期记录在访问时惰性清理。
/// 所有读写都在同一把锁内完成，检查与记录之间不会发生竞争。
pub struct RateLimiter {
    /// 每分钟允许的请求数
    requests_per_minute: usize,
    /// 域名 -> 请求时间戳（按时间升序）
    domain_requests: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_REQUESTS_PER_MINUTE)
    }
}

impl RateLimiter {
    /// 创建新的限流器，上限至少为 1
    pub fn new(requests_per_minute: usize) -> Self {
        Self {
            requests_per_minute: requests_per_minute.max(1),
            domain_requests: Mutex::new(HashMap::new()),
        }
    }

    pub fn requests_per_minute(&self) -> usize {
        self.requests_per_minute
    }

    /// 记录一次对域名的请求
    pub fn add_request(&self, domain: &str) {
        let now = Instant::now();
        let mut log = self.domain_requests.lock();
        let entries = log.entry(domain.to_string()).or_default();
        entries.push_back(now);
        prune(entries, now);
    }

    /// 判断当前是否允许向域名发起请求
    pub fn can_request(&self, domain: &str) -> bool {
        let now = Instant::now();
        let mut log = self.domain_requests.lock();
        match log.get_mut(domain) {
            Some(entries) => {
                prune(entries, now);
                entries.len() < self.requests_per_minute
            }
            None => true,
        }
    }

    /// 距离下一次允许请求还需等待的时间
    ///
    /// 允许请求时返回 `None`
    pub fn wait_time(&self, domain: &str) -> Option<Duration> {
        let now = Instant::now();
        let mut log = self.domain_requests.lock();
        let entries = log.get_mut(domain)?;
        prune(entries, now);
        self.wait_for(entries, now)
    }

    /// 原子地检查并记录一次请求
    ///
    /// 超出上限时不记录，返回需要等待的时间
    pub fn try_acquire(&self, domain: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut log = self.domain_requests.lock();
        let entries = log.entry(domain.to_string()).or_default();
        prune(entries, now);

        if entries.len() < self.requests_per_minute {
            entries.push_back(now);
            return Ok(());
        }

        let wait = self.wait_for(entries, now).unwrap_or_default();
        debug!(
            domain,
            in_window = entries.len(),
            wait_ms = wait.as_millis() as u64,
            "Domain request budget exhausted"
        );
        Err(wait)
    }

    /// 清空单个域名或全部域名的记录
    pub fn reset(&self, domain: Option<&str>) {
        let mut log = self.domain_requests.lock();
        match domain {
            Some(domain) => {
                log.remove(domain);
            }
            None => log.clear(),
        }
    }

    // Deadline is the oldest entry's expiry.
    fn wait_for(&self, entries: &VecDeque<Instant>, now: Instant) -> Option<Duration> {
        if entries.len() < self.requests_per_minute {
            return None;
        }
        let oldest = *entries.front()?;
        (oldest + WINDOW)
            .checked_duration_since(now)
            .filter(|wait| !wait.is_zero())
    }
}

fn prune(entries: &mut VecDeque<Instant>, now: Instant) {
    while let Some(oldest) = entries.front() {
        if now.duration_since(*oldest) >= WINDOW {
            entries.pop_front();
        } else {
            break;
        }
    }
}
