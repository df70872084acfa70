mod inmemory;

use chime_domain::{QuotaKey, QuotaLog, QuotaRule};
pub use inmemory::InMemoryQuotaStore;

/// Keeps one `QuotaLog` per `QuotaKey`
pub trait IQuotaStore: Send + Sync {
    /// Evicts, checks and appends as one atomic step for `key`.
    /// Returns whether the call at `now` (epoch seconds) was admitted.
    fn record(&self, key: &QuotaKey, now: i64, rule: &QuotaRule) -> bool;
    /// Snapshot of the log for `key`, if any call was ever recorded for it
    fn get(&self, key: &QuotaKey) -> Option<QuotaLog>;
    /// Removes the logs without any admitted call in the last `idle_secs`
    /// seconds and returns how many were removed
    fn sweep_idle(&self, now: i64, idle_secs: i64) -> usize;
}
