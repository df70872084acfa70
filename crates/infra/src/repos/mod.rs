mod recurrence;
mod reminder;
mod shared;
mod user;

pub use recurrence::{IRecurrenceRepo, InMemoryRecurrenceRepo, PostgresRecurrenceRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, PostgresReminderRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
pub use user::{IUserRepo, InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub recurrences: Arc<dyn IRecurrenceRepo>,
    pub users: Arc<dyn IUserRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        sqlx::migrate!().run(&pool).await?;

        Ok(Self {
            reminders: Arc::new(PostgresReminderRepo::new(pool.clone())),
            recurrences: Arc::new(PostgresRecurrenceRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            recurrences: Arc::new(InMemoryRecurrenceRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
        }
    }
}
