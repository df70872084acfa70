use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Identifies one sliding window: an identity under a named rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotaKey {
    pub identity: String,
    pub rule: String,
}

impl QuotaKey {
    pub fn new(identity: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            rule: rule.into(),
        }
    }
}

/// At most `max_requests` admitted calls in any `window_secs` long window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaRule {
    pub max_requests: u32,
    pub window_secs: i64,
}

impl QuotaRule {
    pub fn new(max_requests: u32, window_secs: i64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }

    /// Resolves the effective rule field by field. For each field the first
    /// positive value wins, in the order: call site, named rule, default.
    pub fn resolve(call_site: &QuotaLimits, named: Option<&QuotaLimits>, default: &QuotaRule) -> Self {
        let named = named.cloned().unwrap_or_default();
        let max_requests = call_site
            .positive_max_requests()
            .or_else(|| named.positive_max_requests())
            .unwrap_or(default.max_requests);
        let window_secs = call_site
            .positive_window_secs()
            .or_else(|| named.positive_window_secs())
            .unwrap_or(default.window_secs);

        Self {
            max_requests,
            window_secs,
        }
    }
}

impl Default for QuotaRule {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
        }
    }
}

/// Partially specified `QuotaRule`, as found in configuration or at a call
/// site. Missing and non-positive values are ignored during resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaLimits {
    pub max_requests: Option<i64>,
    #[serde(rename = "perSeconds")]
    pub window_secs: Option<i64>,
}

impl QuotaLimits {
    pub fn new(max_requests: i64, window_secs: i64) -> Self {
        Self {
            max_requests: Some(max_requests),
            window_secs: Some(window_secs),
        }
    }

    fn positive_max_requests(&self) -> Option<u32> {
        self.max_requests
            .filter(|max| *max > 0)
            .map(|max| max.min(u32::MAX as i64) as u32)
    }

    fn positive_window_secs(&self) -> Option<i64> {
        self.window_secs.filter(|secs| *secs > 0)
    }
}

/// Timestamps (epoch seconds) of the recently admitted calls for one
/// `QuotaKey`, oldest first. The sequence is never decreasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotaLog {
    timestamps: VecDeque<i64>,
}

impl QuotaLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every timestamp that is `window_secs` or more seconds old,
    /// the window is `(now - window_secs, now]`
    pub fn evict_expired(&mut self, now: i64, window_secs: i64) {
        while let Some(oldest) = self.timestamps.front() {
            if now - *oldest >= window_secs {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Sliding window log check. Evicts expired entries, then either rejects
    /// without touching the log or appends `now` and admits.
    pub fn try_admit(&mut self, now: i64, rule: &QuotaRule) -> bool {
        self.evict_expired(now, rule.window_secs);
        if self.timestamps.len() >= rule.max_requests as usize {
            return false;
        }
        // A clock stepping backwards must not break the ordering
        let ts = match self.timestamps.back() {
            Some(newest) if *newest > now => *newest,
            _ => now,
        };
        self.timestamps.push_back(ts);
        true
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn oldest(&self) -> Option<i64> {
        self.timestamps.front().copied()
    }

    pub fn newest(&self) -> Option<i64> {
        self.timestamps.back().copied()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = &i64> {
        self.timestamps.iter()
    }

    /// No admitted call during the last `idle_secs` seconds
    pub fn is_idle(&self, now: i64, idle_secs: i64) -> bool {
        match self.newest() {
            Some(newest) => now - newest >= idle_secs,
            None => true,
        }
    }
}
