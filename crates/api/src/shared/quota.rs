use crate::error::ChimeError;
use chime_domain::{QuotaKey, QuotaLimits, QuotaRule, User};
use chime_infra::{ChimeContext, IQuotaStore, ISys, QuotaConfig};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, PartialEq)]
pub enum QuotaError {
    #[error("Authentication required")]
    AuthenticationRequired,
    #[error("Free plan limit exceeded for {rule}")]
    QuotaExceeded { identity: String, rule: String },
}

impl From<QuotaError> for ChimeError {
    fn from(e: QuotaError) -> Self {
        match e {
            QuotaError::AuthenticationRequired => Self::Unauthorized(e.to_string()),
            QuotaError::QuotaExceeded { .. } => {
                Self::TooManyRequests("Free plan limit exceeded".into())
            }
        }
    }
}

/// Decides whether a quota limited operation may run for a caller
pub struct QuotaGuard<'a> {
    store: &'a dyn IQuotaStore,
    sys: &'a dyn ISys,
    config: &'a QuotaConfig,
}

impl<'a> QuotaGuard<'a> {
    pub fn new(store: &'a dyn IQuotaStore, sys: &'a dyn ISys, config: &'a QuotaConfig) -> Self {
        Self { store, sys, config }
    }

    pub fn from_context(ctx: &'a ChimeContext) -> Self {
        Self::new(ctx.quota_store.as_ref(), ctx.sys.as_ref(), &ctx.config.quota)
    }

    /// Unauthenticated callers are rejected first. Premium users are always
    /// admitted and leave no trace in the store. Everybody else goes through
    /// the sliding window of `rule_name`.
    pub fn admit(
        &self,
        identity: Option<&User>,
        rule_name: &str,
        overrides: &QuotaLimits,
    ) -> Result<(), QuotaError> {
        let user = identity.ok_or(QuotaError::AuthenticationRequired)?;
        if user.premium {
            debug!("Premium user {} bypasses quota {}", user.username, rule_name);
            return Ok(());
        }

        let rule = QuotaRule::resolve(
            overrides,
            self.config.rule(rule_name),
            &self.config.default_rule,
        );
        let key = QuotaKey::new(user.quota_identity(), rule_name);
        let now = self.sys.get_timestamp_secs();

        if self.store.record(&key, now, &rule) {
            return Ok(());
        }
        warn!(
            "User {} exceeded quota {} of {} calls per {} seconds",
            user.username, rule_name, rule.max_requests, rule.window_secs
        );
        Err(QuotaError::QuotaExceeded {
            identity: key.identity,
            rule: key.rule,
        })
    }
}

/// Awaits `op` only when the guard admits the call. A rejected `op` is
/// dropped without ever being polled.
pub async fn with_quota<T, Fut>(
    guard: &QuotaGuard<'_>,
    identity: Option<&User>,
    rule_name: &str,
    overrides: &QuotaLimits,
    op: Fut,
) -> Result<T, QuotaError>
where
    Fut: Future<Output = T>,
{
    guard.admit(identity, rule_name, overrides)?;
    Ok(op.await)
}

#[cfg(test)]
mod test {
    use super::*;
    use chime_infra::{InMemoryQuotaStore, ManualSys};
    use std::cell::Cell;

    struct TestContext {
        store: InMemoryQuotaStore,
        sys: ManualSys,
        config: QuotaConfig,
    }

    fn setup() -> TestContext {
        let mut config = QuotaConfig::default();
        config
            .rules
            .insert("createReminder".into(), QuotaLimits::new(3, 60));
        TestContext {
            store: InMemoryQuotaStore::new(),
            sys: ManualSys::new(1_000_000),
            config,
        }
    }

    #[test]
    fn rejects_fourth_call_within_window() {
        let ctx = setup();
        let guard = QuotaGuard::new(&ctx.store, &ctx.sys, &ctx.config);
        let user = User::new("u1", false);
        let no_override = QuotaLimits::default();

        for _ in 0..3 {
            assert!(guard.admit(Some(&user), "createReminder", &no_override).is_ok());
            ctx.sys.advance_millis(1000);
        }
        assert_eq!(
            guard.admit(Some(&user), "createReminder", &no_override),
            Err(QuotaError::QuotaExceeded {
                identity: "u1".into(),
                rule: "createReminder".into()
            })
        );

        // The first call ages out 60 seconds after it was admitted
        ctx.sys.set_timestamp_millis(1_000_000 + 60_000);
        assert!(guard.admit(Some(&user), "createReminder", &no_override).is_ok());
        assert!(guard.admit(Some(&user), "createReminder", &no_override).is_err());
    }

    #[test]
    fn premium_users_bypass_the_quota() {
        let ctx = setup();
        let guard = QuotaGuard::new(&ctx.store, &ctx.sys, &ctx.config);
        let user = User::new("u1", true);

        for _ in 0..100 {
            assert!(guard
                .admit(Some(&user), "createReminder", &QuotaLimits::default())
                .is_ok());
        }
        assert!(ctx.store.is_empty());
    }

    #[test]
    fn rejects_unauthenticated_callers() {
        let ctx = setup();
        let guard = QuotaGuard::new(&ctx.store, &ctx.sys, &ctx.config);
        assert_eq!(
            guard.admit(None, "createReminder", &QuotaLimits::default()),
            Err(QuotaError::AuthenticationRequired)
        );
        assert!(ctx.store.is_empty());
    }

    #[test]
    fn call_site_override_wins() {
        let ctx = setup();
        let guard = QuotaGuard::new(&ctx.store, &ctx.sys, &ctx.config);
        let user = User::new("u1", false);
        let overrides = QuotaLimits {
            max_requests: Some(1),
            window_secs: None,
        };

        assert!(guard.admit(Some(&user), "createReminder", &overrides).is_ok());
        assert!(guard.admit(Some(&user), "createReminder", &overrides).is_err());
        // Unknown rules use the defaults of 10 calls per minute
        for _ in 0..10 {
            assert!(guard
                .admit(Some(&user), "other", &QuotaLimits::default())
                .is_ok());
        }
        assert!(guard
            .admit(Some(&user), "other", &QuotaLimits::default())
            .is_err());
    }

    #[actix_web::main]
    #[test]
    async fn rejected_operation_never_runs() {
        let ctx = setup();
        let guard = QuotaGuard::new(&ctx.store, &ctx.sys, &ctx.config);
        let user = User::new("u1", false);
        let overrides = QuotaLimits::new(1, 60);
        let runs = Cell::new(0);

        let res = with_quota(&guard, Some(&user), "createReminder", &overrides, async {
            runs.set(runs.get() + 1);
        })
        .await;
        assert!(res.is_ok());

        let res = with_quota(&guard, Some(&user), "createReminder", &overrides, async {
            runs.set(runs.get() + 1);
        })
        .await;
        assert!(res.is_err());
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn maps_to_http_errors() {
        assert_eq!(
            ChimeError::from(QuotaError::AuthenticationRequired),
            ChimeError::Unauthorized("Authentication required".into())
        );
        assert!(matches!(
            ChimeError::from(QuotaError::QuotaExceeded {
                identity: "u1".into(),
                rule: "createReminder".into()
            }),
            ChimeError::TooManyRequests(_)
        ));
    }
}
