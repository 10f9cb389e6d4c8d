//! Fixed-window request counter keyed by client identity.
//!
//! Each identity gets `limit` requests per window. The window is a hard
//! reset rather than a rolling one, so a burst straddling a boundary can
//! see up to twice the limit. State lives in memory only and is lost on
//! restart.

use crate::config::RateLimitConfig;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_start: Instant,
}

impl RateLimitEntry {
    fn new(now: Instant) -> Self {
        Self {
            count: 1,
            window_start: now,
        }
    }

    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }
}

pub struct RateLimiter {
    entries: Mutex<HashMap<String, RateLimitEntry>>,
    exempt: HashSet<String>,
    limit: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration, exempt: impl IntoIterator<Item = String>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            exempt: exempt.into_iter().collect(),
            limit,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.limit,
            Duration::from_millis(config.window_ms),
            config.exempt.iter().cloned(),
        )
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decides whether a request from `identity` may proceed.
    pub fn admit(&self, identity: &str) -> bool {
        self.admit_at(identity, Instant::now())
    }

    pub fn admit_at(&self, identity: &str, now: Instant) -> bool {
        if self.exempt.contains(identity) {
            return true;
        }

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = entries.get_mut(identity) {
            if entry.expired(now, self.window) {
                *entry = RateLimitEntry::new(now);
                return true;
            }
            if entry.count >= self.limit {
                warn!(client = %identity, count = entry.count, "Rate limit exceeded");
                return false;
            }
            entry.count += 1;
            return true;
        }

        entries.insert(identity.to_string(), RateLimitEntry::new(now));
        true
    }

    /// Drops entries whose window has elapsed; returns how many were removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| !entry.expired(now, self.window));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Swept stale rate limit entries");
        }
        removed
    }

    pub fn entry(&self, identity: &str) -> Option<RateLimitEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identity)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
