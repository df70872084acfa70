use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use chime_domain::{Reminder, ReminderStatus, ID};

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        if save(reminder, &self.reminders) {
            return Ok(());
        }
        Err(anyhow::anyhow!("Reminder {} does not exist", reminder.id))
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_due(&self, status: ReminderStatus, not_after: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| {
            r.status == status && r.fire_at <= not_after
        });
        reminders.sort_by_key(|r| r.fire_at);
        Ok(reminders)
    }

    async fn find_by_owner(&self, owner_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let mut reminders = find_by(&self.reminders, |r| r.owner_id == *owner_id);
        reminders.sort_by_key(|r| r.fire_at);
        Ok(reminders)
    }

    async fn set_status_if(
        &self,
        reminder_id: &ID,
        from: ReminderStatus,
        to: ReminderStatus,
        updated: i64,
    ) -> anyhow::Result<bool> {
        let mut reminders = self.reminders.lock().unwrap();
        match reminders
            .iter_mut()
            .find(|r| r.id == *reminder_id && r.status == from)
        {
            Some(reminder) => {
                reminder.set_status(to, updated);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }
}
