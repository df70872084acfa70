mod inmemory;
mod postgres;

use chime_domain::{RecurrenceDescriptor, ID};
pub use inmemory::InMemoryRecurrenceRepo;
pub use postgres::PostgresRecurrenceRepo;

#[async_trait::async_trait]
pub trait IRecurrenceRepo: Send + Sync {
    async fn insert(&self, recurrence: &RecurrenceDescriptor) -> anyhow::Result<()>;
    async fn find(&self, recurrence_id: &ID) -> Option<RecurrenceDescriptor>;
    async fn delete(&self, recurrence_id: &ID) -> Option<RecurrenceDescriptor>;
}
