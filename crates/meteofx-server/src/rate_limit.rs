//! Fixed-window request limiter keyed by client identifier.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use meteofx_core::RateLimitConfig;
use parking_lot::Mutex;

#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    records: Mutex<HashMap<String, WindowRecord>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_millis(config.window_ms))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count a request from `identifier`; `false` means it is over the limit.
    pub fn check(&self, identifier: &str) -> bool {
        self.check_at(identifier, Instant::now())
    }

    pub fn check_at(&self, identifier: &str, now: Instant) -> bool {
        let mut records = self.records.lock();

        match records.get_mut(identifier) {
            Some(record) if now <= record.reset_at => {
                if record.count >= self.max_requests {
                    return false;
                }
                record.count += 1;
                true
            }
            _ => {
                records.insert(
                    identifier.to_string(),
                    WindowRecord {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                true
            }
        }
    }

    /// Drop records whose window has ended. Returns how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, record| now <= record.reset_at);
        before - records.len()
    }

    pub fn tracked(&self) -> usize {
        self.records.lock().len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
