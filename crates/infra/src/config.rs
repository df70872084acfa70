use crate::services::{
    notification::{ChannelWebhook, DispatcherConfig, FallbackMode, DEFAULT_SEND_TIMEOUT_MILLIS},
    resilience::{
        CircuitBreakerConfig, RetryPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_WAIT_MILLIS,
    },
};
use chime_domain::{NotificationChannel, QuotaLimits, QuotaRule};
use chime_utils::create_random_secret;
use std::{collections::HashMap, fmt::Display, str::FromStr, time::Duration};
use tracing::{info, warn};
use url::Url;

pub const DEFAULT_REMINDER_CLOCK_PERIOD_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct QuotaConfig {
    /// Used for every field a named rule or call site leaves unspecified
    pub default_rule: QuotaRule,
    /// Named rules, e.g. `createReminder`
    pub rules: HashMap<String, QuotaLimits>,
    /// Quota logs without any admitted call for this long are removed.
    /// `None` keeps them for the lifetime of the process.
    pub idle_secs: Option<i64>,
}

impl QuotaConfig {
    pub fn rule(&self, name: &str) -> Option<&QuotaLimits> {
        self.rules.get(name)
    }

    /// Removing a log that still holds timestamps inside its window would
    /// reset the quota, so the sweep never looks at less than the longest
    /// configured window.
    pub fn sweep_idle_secs(&self) -> Option<i64> {
        let longest_window = self
            .rules
            .values()
            .filter_map(|limits| limits.window_secs)
            .fold(self.default_rule.window_secs, i64::max);
        self.idle_secs.map(|idle| idle.max(longest_window))
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_rule: Default::default(),
            rules: HashMap::new(),
            idle_secs: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret code used to create new `User`s
    pub create_user_secret_code: String,
    /// Port for the application to run on
    pub port: usize,
    /// How often the reminder clock looks for due reminders
    pub reminder_clock_period: Duration,
    pub quota: QuotaConfig,
    pub dispatcher: DispatcherConfig,
}

impl Config {
    pub fn new() -> Self {
        let create_user_secret_code = match std::env::var("CREATE_USER_SECRET_CODE") {
            Ok(code) => code,
            Err(_) => {
                info!("Did not find CREATE_USER_SECRET_CODE environment variable. Going to create one.");
                let code = create_random_secret(16);
                info!(
                    "Secret code for creating users was generated and set to: {}",
                    code
                );
                code
            }
        };
        let port = positive_env_or("PORT", 5000usize);
        let reminder_clock_period_secs =
            positive_env_or("REMINDER_CLOCK_PERIOD_SECS", DEFAULT_REMINDER_CLOCK_PERIOD_SECS);

        Self {
            create_user_secret_code,
            port,
            reminder_clock_period: Duration::from_secs(reminder_clock_period_secs),
            quota: quota_config_from_env(),
            dispatcher: dispatcher_config_from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn quota_config_from_env() -> QuotaConfig {
    let defaults = QuotaRule::default();
    let default_rule = QuotaRule::new(
        positive_env_or("QUOTA_DEFAULT_MAX_REQUESTS", defaults.max_requests),
        positive_env_or("QUOTA_DEFAULT_PER_SECONDS", defaults.window_secs),
    );
    let rules = match std::env::var("QUOTA_RULES") {
        Ok(rules) => parse_quota_rules(&rules),
        Err(_) => HashMap::new(),
    };
    let idle_secs = std::env::var("QUOTA_IDLE_SECS")
        .ok()
        .map(|_| positive_env_or("QUOTA_IDLE_SECS", 60 * 60i64));

    QuotaConfig {
        default_rule,
        rules,
        idle_secs,
    }
}

/// Named rules are given as json, e.g.
/// `{"createReminder": {"maxRequests": 3, "perSeconds": 60}}`
pub fn parse_quota_rules(rules: &str) -> HashMap<String, QuotaLimits> {
    match serde_json::from_str(rules) {
        Ok(rules) => rules,
        Err(e) => {
            warn!(
                "The given QUOTA_RULES could not be parsed: {}, ignoring the named quota rules.",
                e
            );
            HashMap::new()
        }
    }
}

fn dispatcher_config_from_env() -> DispatcherConfig {
    let breaker_defaults = CircuitBreakerConfig::default();
    let failure_rate_threshold = match env_or(
        "BREAKER_FAILURE_RATE",
        breaker_defaults.failure_rate_threshold,
    ) {
        rate if rate > 0.0 && rate <= 100.0 => rate,
        rate => {
            warn!(
                "The given BREAKER_FAILURE_RATE: {} is not a percentage, falling back to: {}.",
                rate, breaker_defaults.failure_rate_threshold
            );
            breaker_defaults.failure_rate_threshold
        }
    };
    let breaker = CircuitBreakerConfig {
        window_size: positive_env_or("BREAKER_WINDOW_SIZE", breaker_defaults.window_size),
        minimum_calls: positive_env_or("BREAKER_MINIMUM_CALLS", breaker_defaults.minimum_calls),
        failure_rate_threshold,
        open_duration: Duration::from_secs(positive_env_or(
            "BREAKER_OPEN_SECS",
            breaker_defaults.open_duration.as_secs(),
        )),
        half_open_calls: positive_env_or(
            "BREAKER_HALF_OPEN_CALLS",
            breaker_defaults.half_open_calls,
        ),
    };

    let retry = RetryPolicy::new(
        positive_env_or("DISPATCH_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
        Duration::from_millis(env_or(
            "DISPATCH_RETRY_WAIT_MILLIS",
            DEFAULT_RETRY_WAIT_MILLIS,
        )),
    );

    let mut webhooks = HashMap::new();
    for channel in NotificationChannel::all().iter() {
        if let Some(webhook) = channel_webhook_from_env(*channel) {
            info!("Channel {} will be delivered to {}", channel, webhook.url);
            webhooks.insert(*channel, webhook);
        }
    }

    DispatcherConfig {
        retry,
        breaker,
        send_timeout: Duration::from_millis(positive_env_or(
            "DISPATCH_SEND_TIMEOUT_MILLIS",
            DEFAULT_SEND_TIMEOUT_MILLIS,
        )),
        fallback_mode: env_or("DISPATCH_FALLBACK_MODE", FallbackMode::default()),
        webhooks,
    }
}

fn channel_webhook_from_env(channel: NotificationChannel) -> Option<ChannelWebhook> {
    let prefix = channel.as_str().to_uppercase();
    let url_var = format!("{}_WEBHOOK_URL", prefix);
    let url = std::env::var(&url_var).ok()?;
    let url = match Url::parse(&url) {
        Ok(url) => url,
        Err(e) => {
            warn!(
                "The given {}: {} is not a valid url ({}), channel {} will be sent to the log.",
                url_var, url, e, channel
            );
            return None;
        }
    };
    let key = std::env::var(format!("{}_WEBHOOK_KEY", prefix)).ok();
    Some(ChannelWebhook { url, key })
}

/// Reads and parses the environment variable `name`, falling back to
/// `default` when it is missing or not valid
fn env_or<T: FromStr + Display>(name: &str, default: T) -> T {
    let value = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.trim().parse::<T>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default: {}.",
                name, value, default
            );
            default
        }
    }
}

/// Like `env_or` but zero and negative numbers fall back to `default` as well
fn positive_env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Display + PartialOrd + Default + Copy,
{
    let value = env_or(name, default);
    if value > T::default() {
        return value;
    }
    warn!(
        "The given {}: {} must be positive, falling back to the default: {}.",
        name, value, default
    );
    default
}
