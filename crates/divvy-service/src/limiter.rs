//! Sliding-window rate limiting.
//!
//! Each key (a user, an IP) gets its own window of request timestamps.
//! A request is allowed while fewer than `max_requests` timestamps fall
//! inside the trailing window; rejected requests report how long until
//! the oldest one ages out.
//!
//! State lives in process memory behind a [`tokio::sync::Mutex`]. Budgets
//! are advisory capacity protection, so losing them on restart is fine and
//! keeps this layer free of external infrastructure.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::warn;

use crate::error::{ServiceError, ServiceResult};

/// How many requests a key may make within a trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl RateLimitPolicy {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        RateLimitPolicy {
            max_requests,
            window_secs,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// In-memory sliding-window limiter, one timestamp deque per key.
pub struct SlidingWindowLimiter {
    policy: RateLimitPolicy,
    windows: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl SlidingWindowLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        SlidingWindowLimiter {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Record a request for `key`, or reject it if the key's budget for the
    /// trailing window is spent.
    pub async fn check(&self, key: &str) -> ServiceResult<()> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let window = windows.entry(key.to_string()).or_default();

        // Drop timestamps that have aged out of the trailing window.
        while let Some(&oldest) = window.front() {
            if now.duration_since(oldest) >= self.policy.window() {
                window.pop_front();
            } else {
                break;
            }
        }

        if window.len() >= self.policy.max_requests as usize {
            let retry_after_secs = self.seconds_until_reset(window, now);
            warn!(key, retry_after_secs, "rate limit exceeded");
            return Err(ServiceError::RateLimited { retry_after_secs });
        }

        window.push_back(now);
        Ok(())
    }

    /// Whole seconds until the oldest timestamp leaves the window, rounded
    /// up so callers never retry a moment too early.
    fn seconds_until_reset(&self, window: &VecDeque<Instant>, now: Instant) -> u64 {
        match window.front() {
            Some(&oldest) => {
                let remaining = self.policy.window().saturating_sub(now.duration_since(oldest));
                let secs = remaining.as_secs();
                if remaining.subsec_nanos() > 0 {
                    secs + 1
                } else {
                    secs
                }
            }
            None => self.policy.window_secs,
        }
    }
}

/// Rate-limit key for an authenticated user.
pub fn user_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// Rate-limit key for an unauthenticated caller.
pub fn ip_key(addr: &str) -> String {
    format!("ip:{addr}")
}
