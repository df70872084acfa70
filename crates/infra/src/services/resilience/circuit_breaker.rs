//! Count based circuit breaker.
//!
//! ```text
//! CLOSED --failure rate >= threshold--> OPEN
//! OPEN --open duration elapsed--> HALF_OPEN
//! HALF_OPEN --probe failure rate >= threshold--> OPEN
//! HALF_OPEN --probe failure rate < threshold--> CLOSED
//! ```

use crate::system::ISys;
use std::{collections::VecDeque, sync::Arc, sync::Mutex, time::Duration};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct CircuitBreakerConfig {
    /// Number of most recent call outcomes considered while closed
    pub window_size: usize,
    /// No failure rate is computed before this many calls are recorded
    pub minimum_calls: usize,
    /// Failure rate in percent at which the breaker opens
    pub failure_rate_threshold: f64,
    /// How long calls are rejected before probing again
    pub open_duration: Duration,
    /// Number of probe calls permitted while half open
    pub half_open_calls: usize,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 100,
            minimum_calls: 100,
            failure_rate_threshold: 50.0,
            open_duration: Duration::from_secs(60),
            half_open_calls: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
enum BreakerState {
    Closed {
        outcomes: VecDeque<bool>,
    },
    Open {
        opened_at: i64,
    },
    HalfOpen {
        permitted: usize,
        outcomes: Vec<bool>,
    },
}

impl BreakerState {
    fn closed() -> Self {
        Self::Closed {
            outcomes: VecDeque::new(),
        }
    }
}

/// Outcomes are `true` for success
fn failure_rate<'a>(outcomes: impl Iterator<Item = &'a bool>) -> f64 {
    let (total, failures) = outcomes.fold((0usize, 0usize), |(total, failures), ok| {
        (total + 1, if *ok { failures } else { failures + 1 })
    });
    if total == 0 {
        return 0.0;
    }
    failures as f64 * 100.0 / total as f64
}

pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    sys: Arc<dyn ISys>,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig, sys: Arc<dyn ISys>) -> Self {
        Self {
            name: name.into(),
            config,
            sys,
            state: Mutex::new(BreakerState::closed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> CircuitState {
        match *self.state.lock().unwrap() {
            BreakerState::Closed { .. } => CircuitState::Closed,
            BreakerState::Open { .. } => CircuitState::Open,
            BreakerState::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }

    /// Asks for permission to perform one call. Every permitted call must be
    /// followed by exactly one `on_success` or `on_error`.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        match &mut *state {
            BreakerState::Closed { .. } => true,
            BreakerState::Open { opened_at } => {
                let open_millis = self.config.open_duration.as_millis() as i64;
                if self.sys.get_timestamp_millis() - *opened_at < open_millis {
                    return false;
                }
                info!("Circuit breaker {} is half open", self.name);
                *state = BreakerState::HalfOpen {
                    permitted: 1,
                    outcomes: Vec::new(),
                };
                true
            }
            BreakerState::HalfOpen { permitted, .. } => {
                if *permitted >= self.config.half_open_calls {
                    return false;
                }
                *permitted += 1;
                true
            }
        }
    }

    pub fn on_success(&self) {
        self.record(true);
    }

    pub fn on_error(&self) {
        self.record(false);
    }

    fn record(&self, success: bool) {
        let mut state = self.state.lock().unwrap();
        let next = match &mut *state {
            BreakerState::Closed { outcomes } => {
                outcomes.push_back(success);
                while outcomes.len() > self.config.window_size {
                    outcomes.pop_front();
                }
                let minimum_calls = self.config.minimum_calls.min(self.config.window_size);
                if outcomes.len() < minimum_calls {
                    return;
                }
                let rate = failure_rate(outcomes.iter());
                if rate < self.config.failure_rate_threshold {
                    return;
                }
                warn!(
                    "Circuit breaker {} opened with a failure rate of {:.1}%",
                    self.name, rate
                );
                self.open()
            }
            BreakerState::HalfOpen { outcomes, .. } => {
                outcomes.push(success);
                if outcomes.len() < self.config.half_open_calls {
                    return;
                }
                let rate = failure_rate(outcomes.iter());
                if rate < self.config.failure_rate_threshold {
                    info!("Circuit breaker {} closed again", self.name);
                    BreakerState::closed()
                } else {
                    warn!(
                        "Circuit breaker {} opened again with a failure rate of {:.1}%",
                        self.name, rate
                    );
                    self.open()
                }
            }
            // A call that was permitted before the breaker opened
            BreakerState::Open { .. } => return,
        };
        *state = next;
    }

    fn open(&self) -> BreakerState {
        BreakerState::Open {
            opened_at: self.sys.get_timestamp_millis(),
        }
    }
}
