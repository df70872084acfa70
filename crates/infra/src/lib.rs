mod config;
mod quota;
mod repos;
mod services;
mod system;

pub use config::{parse_quota_rules, Config, QuotaConfig, DEFAULT_REMINDER_CLOCK_PERIOD_SECS};
pub use quota::{IQuotaStore, InMemoryQuotaStore};
pub use repos::{IRecurrenceRepo, IReminderRepo, IUserRepo, Repos};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, ManualSys, RealSys};
use tracing::info;

use services::notification::NotificationDispatcher;

#[derive(Clone)]
pub struct ChimeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub quota_store: Arc<dyn IQuotaStore>,
    pub notifier: Arc<NotificationDispatcher>,
}

impl ChimeContext {
    /// Assembles a context, the dispatcher and its circuit breaker run on `sys`
    pub fn new(repos: Repos, config: Config, sys: Arc<dyn ISys>) -> Self {
        let notifier = NotificationDispatcher::create(&config.dispatcher, sys.clone());
        Self {
            repos,
            config,
            sys,
            quota_store: Arc::new(InMemoryQuotaStore::new()),
            notifier: Arc::new(notifier),
        }
    }

    pub fn create_inmemory() -> Self {
        Self::new(Repos::create_inmemory(), Config::new(), Arc::new(RealSys {}))
    }

    async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(connection_string).await?;
        Ok(Self::new(repos, Config::new(), Arc::new(RealSys {})))
    }
}

/// Will setup the infrastructure context given the environment. Postgres is
/// used when `DATABASE_URL` is set, inmemory repositories otherwise.
pub async fn setup_context() -> anyhow::Result<ChimeContext> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(connection_string) => ChimeContext::create_postgres(&connection_string).await,
        Err(_) => {
            info!(
                "{} env var is not present, storing everything in memory.",
                PSQL_CONNECTION_STRING
            );
            Ok(ChimeContext::create_inmemory())
        }
    }
}
