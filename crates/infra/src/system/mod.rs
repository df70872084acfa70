use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

// Mocking out time so that it is possible to run tests that depend on time.
pub trait ISys: Send + Sync {
    /// The current timestamp in millis
    fn get_timestamp_millis(&self) -> i64;

    /// The current timestamp in seconds, the resolution of the quota windows
    fn get_timestamp_secs(&self) -> i64 {
        self.get_timestamp_millis().div_euclid(1000)
    }
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to
pub struct ManualSys {
    now: AtomicI64,
}

impl ManualSys {
    pub fn new(timestamp_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(timestamp_millis),
        }
    }

    pub fn set_timestamp_millis(&self, timestamp_millis: i64) {
        self.now.store(timestamp_millis, Ordering::SeqCst);
    }

    pub fn advance_millis(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl ISys for ManualSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
