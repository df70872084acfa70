use super::IRecurrenceRepo;
use crate::repos::shared::inmemory_repo::*;
use chime_domain::{RecurrenceDescriptor, ID};

pub struct InMemoryRecurrenceRepo {
    recurrences: std::sync::Mutex<Vec<RecurrenceDescriptor>>,
}

impl InMemoryRecurrenceRepo {
    pub fn new() -> Self {
        Self {
            recurrences: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IRecurrenceRepo for InMemoryRecurrenceRepo {
    async fn insert(&self, recurrence: &RecurrenceDescriptor) -> anyhow::Result<()> {
        insert(recurrence, &self.recurrences);
        Ok(())
    }

    async fn find(&self, recurrence_id: &ID) -> Option<RecurrenceDescriptor> {
        find(recurrence_id, &self.recurrences)
    }

    async fn delete(&self, recurrence_id: &ID) -> Option<RecurrenceDescriptor> {
        delete(recurrence_id, &self.recurrences)
    }
}
