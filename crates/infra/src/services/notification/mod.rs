mod channel;
mod webhook;

use super::resilience::{
    with_retry_and_breaker, CircuitBreaker, CircuitBreakerConfig, ResilienceError, RetryPolicy,
};
use crate::system::ISys;
use chime_domain::{NotificationChannel, Reminder};
pub use channel::{IChannelSender, LogChannelSender};
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    str::FromStr,
    sync::{Arc, Mutex},
    time::Duration,
};
use thiserror::Error;
use tracing::{debug, warn};
pub use webhook::{ChannelWebhook, WebhookChannelSender, WEBHOOK_KEY_HEADER};

pub const DEFAULT_SEND_TIMEOUT_MILLIS: u64 = 10_000;

/// What to do with a `Reminder` when the circuit breaker rejects its dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMode {
    /// Log the failure and report the `Reminder` as handled
    Suppress,
    /// Surface `DispatchError::CircuitOpen` so the `Reminder` is marked as failed
    Propagate,
}

impl Default for FallbackMode {
    fn default() -> Self {
        Self::Suppress
    }
}

impl Display for FallbackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suppress => f.write_str("suppress"),
            Self::Propagate => f.write_str("propagate"),
        }
    }
}

impl FromStr for FallbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "suppress" => Ok(Self::Suppress),
            "propagate" => Ok(Self::Propagate),
            _ => Err(format!("Invalid fallback mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Every channel accepted the message
    Delivered,
    /// The breaker was open and the failure was swallowed by the fallback
    Suppressed { reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Channel {channel} failed to deliver: {reason}")]
    ChannelFailed {
        channel: NotificationChannel,
        reason: String,
    },
    #[error("Channel {channel} did not respond within {millis} ms")]
    Timeout {
        channel: NotificationChannel,
        millis: u128,
    },
    #[error("No sender is configured for channel {0}")]
    MissingSender(NotificationChannel),
    #[error("Circuit breaker {name} is open")]
    CircuitOpen { name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    pub retry: RetryPolicy,
    pub breaker: CircuitBreakerConfig,
    pub send_timeout: Duration,
    pub fallback_mode: FallbackMode,
    /// Channels without a webhook are sent to the log
    pub webhooks: HashMap<NotificationChannel, ChannelWebhook>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            retry: Default::default(),
            breaker: Default::default(),
            send_timeout: Duration::from_millis(DEFAULT_SEND_TIMEOUT_MILLIS),
            fallback_mode: Default::default(),
            webhooks: HashMap::new(),
        }
    }
}

/// Pushes a `Reminder` through all of its channels, guarded by a retry
/// policy and a circuit breaker shared by every dispatch.
pub struct NotificationDispatcher {
    senders: HashMap<NotificationChannel, Arc<dyn IChannelSender>>,
    retry: RetryPolicy,
    breaker: CircuitBreaker,
    send_timeout: Duration,
    fallback_mode: FallbackMode,
}

impl NotificationDispatcher {
    /// Dispatcher without any registered sender
    pub fn new(config: &DispatcherConfig, sys: Arc<dyn ISys>) -> Self {
        Self {
            senders: HashMap::new(),
            retry: config.retry.clone(),
            breaker: CircuitBreaker::new("default", config.breaker.clone(), sys),
            send_timeout: config.send_timeout,
            fallback_mode: config.fallback_mode,
        }
    }

    /// Dispatcher with a sender for every channel, the configured webhooks
    /// or the log
    pub fn create(config: &DispatcherConfig, sys: Arc<dyn ISys>) -> Self {
        let mut dispatcher = Self::new(config, sys);
        for channel in NotificationChannel::all().iter() {
            let sender: Arc<dyn IChannelSender> = match config.webhooks.get(channel) {
                Some(webhook) => Arc::new(WebhookChannelSender::new(webhook.clone())),
                None => Arc::new(LogChannelSender {}),
            };
            dispatcher = dispatcher.with_sender(*channel, sender);
        }
        dispatcher
    }

    pub fn with_sender(mut self, channel: NotificationChannel, sender: Arc<dyn IChannelSender>) -> Self {
        self.senders.insert(channel, sender);
        self
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Channels that accepted the message are not sent to again when the
    /// dispatch is retried.
    pub async fn send(&self, reminder: &Reminder) -> Result<DispatchOutcome, DispatchError> {
        let delivered_channels = Mutex::new(HashSet::new());
        let delivered = &delivered_channels;
        let res = with_retry_and_breaker(&self.retry, &self.breaker, move |attempt| {
            self.deliver_pending(reminder, delivered, attempt)
        })
        .await;

        match res {
            Ok(()) => Ok(DispatchOutcome::Delivered),
            Err(ResilienceError::Failed(e)) => Err(e),
            Err(ResilienceError::CircuitOpen { name, last_error }) => {
                self.fallback(reminder, name, last_error)
            }
        }
    }

    async fn deliver_pending(
        &self,
        reminder: &Reminder,
        delivered: &Mutex<HashSet<NotificationChannel>>,
        attempt: u32,
    ) -> Result<(), DispatchError> {
        let mut first_error = None;
        for channel in &reminder.channels {
            if delivered.lock().unwrap().contains(channel) {
                continue;
            }
            match self.send_on_channel(reminder, *channel).await {
                Ok(()) => {
                    debug!("Reminder {} sent on {}", reminder.id, channel);
                    delivered.lock().unwrap().insert(*channel);
                }
                Err(e) => {
                    warn!(
                        "Attempt {} to send reminder {} failed: {}",
                        attempt, reminder.id, e
                    );
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn send_on_channel(
        &self,
        reminder: &Reminder,
        channel: NotificationChannel,
    ) -> Result<(), DispatchError> {
        let sender = self
            .senders
            .get(&channel)
            .ok_or(DispatchError::MissingSender(channel))?;
        let message = reminder.render(channel);

        match tokio::time::timeout(self.send_timeout, sender.send(&message)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(DispatchError::ChannelFailed {
                channel,
                reason: e.to_string(),
            }),
            Err(_) => Err(DispatchError::Timeout {
                channel,
                millis: self.send_timeout.as_millis(),
            }),
        }
    }

    fn fallback(
        &self,
        reminder: &Reminder,
        breaker: String,
        last_error: Option<DispatchError>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let reason = match last_error {
            Some(e) => e.to_string(),
            None => format!("Circuit breaker {} is open", breaker),
        };
        warn!(
            "Fallback: Notification not sent for {}. Reason: {}",
            reminder.title, reason
        );
        match self.fallback_mode {
            FallbackMode::Suppress => Ok(DispatchOutcome::Suppressed { reason }),
            FallbackMode::Propagate => Err(DispatchError::CircuitOpen { name: breaker }),
        }
    }
}
