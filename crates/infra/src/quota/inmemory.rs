use super::IQuotaStore;
use chime_domain::{QuotaKey, QuotaLog, QuotaRule};
use dashmap::DashMap;

/// Process local `IQuotaStore`. Distinct keys live in different shards and
/// never contend, calls for the same key are serialized by the entry lock.
#[derive(Default)]
pub struct InMemoryQuotaStore {
    logs: DashMap<QuotaKey, QuotaLog>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

impl IQuotaStore for InMemoryQuotaStore {
    fn record(&self, key: &QuotaKey, now: i64, rule: &QuotaRule) -> bool {
        let mut log = self.logs.entry(key.clone()).or_default();
        log.try_admit(now, rule)
    }

    fn get(&self, key: &QuotaKey) -> Option<QuotaLog> {
        self.logs.get(key).map(|log| log.clone())
    }

    fn sweep_idle(&self, now: i64, idle_secs: i64) -> usize {
        let mut removed = 0;
        self.logs.retain(|_, log| {
            let keep = !log.is_idle(now, idle_secs);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}
