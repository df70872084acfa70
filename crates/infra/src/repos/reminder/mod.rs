mod inmemory;
mod postgres;

use chime_domain::{Reminder, ReminderStatus, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Fails if the `Reminder` does not exist
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// Every `Reminder` in `status` with a fire time at or before `not_after`,
    /// earliest first
    async fn find_due(&self, status: ReminderStatus, not_after: i64) -> anyhow::Result<Vec<Reminder>>;
    /// Every `Reminder` owned by the given `User`, earliest fire time first
    async fn find_by_owner(&self, owner_id: &ID) -> anyhow::Result<Vec<Reminder>>;
    /// Moves the `Reminder` from `from` to `to` and touches nothing else.
    /// Returns false when it no longer exists or is not in `from` anymore.
    async fn set_status_if(
        &self,
        reminder_id: &ID,
        from: ReminderStatus,
        to: ReminderStatus,
        updated: i64,
    ) -> anyhow::Result<bool>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
}

#[cfg(test)]
mod tests {
    use crate::ChimeContext;
    use chime_domain::{NotificationChannel, Reminder, ReminderKind, ReminderStatus, RepeatType};

    fn reminder_factory(fire_at: i64, status: ReminderStatus) -> Reminder {
        Reminder {
            id: Default::default(),
            owner_id: Default::default(),
            title: "Pay rent".into(),
            message: "Rent is due today".into(),
            kind: ReminderKind::Personal,
            fire_at,
            status,
            channels: vec![NotificationChannel::Email],
            repeat: RepeatType::None,
            recurrence_id: None,
            contact_id: None,
            group_id: None,
            created: 0,
            updated: 0,
        }
    }

    #[tokio::test]
    async fn finds_only_due_reminders_in_status() {
        let ctx = ChimeContext::create_inmemory();
        let late = reminder_factory(200, ReminderStatus::Scheduled);
        let early = reminder_factory(100, ReminderStatus::Scheduled);
        let future = reminder_factory(301, ReminderStatus::Scheduled);
        let sent = reminder_factory(100, ReminderStatus::Sent);
        let paused = reminder_factory(100, ReminderStatus::Paused);
        let failed = reminder_factory(100, ReminderStatus::Failed);
        for reminder in [&late, &early, &future, &sent, &paused, &failed].iter() {
            ctx.repos
                .reminders
                .insert(reminder)
                .await
                .expect("To insert reminder");
        }

        let due = ctx
            .repos
            .reminders
            .find_due(ReminderStatus::Scheduled, 300)
            .await
            .expect("To find due reminders");
        let due_ids = due.into_iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(due_ids, vec![early.id.clone(), late.id.clone()]);

        // Boundary is inclusive
        let due = ctx
            .repos
            .reminders
            .find_due(ReminderStatus::Scheduled, 301)
            .await
            .expect("To find due reminders");
        assert_eq!(due.len(), 3);
    }

    #[tokio::test]
    async fn saved_status_removes_reminder_from_due_set() {
        let ctx = ChimeContext::create_inmemory();
        let mut reminder = reminder_factory(100, ReminderStatus::Scheduled);
        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .expect("To insert reminder");

        assert!(reminder.mark_sent(150));
        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .expect("To save reminder");

        let due = ctx
            .repos
            .reminders
            .find_due(ReminderStatus::Scheduled, 1000)
            .await
            .expect("To find due reminders");
        assert!(due.is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert_eq!(stored.updated, 150);
    }

    #[tokio::test]
    async fn status_transition_only_applies_to_expected_status() {
        let ctx = ChimeContext::create_inmemory();
        let mut reminder = reminder_factory(100, ReminderStatus::Scheduled);
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        // Changed elsewhere after it was loaded
        reminder.title = "Pay rent twice".into();
        reminder.set_status(ReminderStatus::Paused, 120);
        ctx.repos.reminders.save(&reminder).await.unwrap();

        let applied = ctx
            .repos
            .reminders
            .set_status_if(&reminder.id, ReminderStatus::Scheduled, ReminderStatus::Sent, 150)
            .await
            .unwrap();
        assert!(!applied);
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Paused);
        assert_eq!(stored.updated, 120);

        reminder.set_status(ReminderStatus::Scheduled, 130);
        ctx.repos.reminders.save(&reminder).await.unwrap();
        let applied = ctx
            .repos
            .reminders
            .set_status_if(&reminder.id, ReminderStatus::Scheduled, ReminderStatus::Sent, 150)
            .await
            .unwrap();
        assert!(applied);
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Sent);
        assert_eq!(stored.updated, 150);
        assert_eq!(stored.title, "Pay rent twice");

        let unknown = reminder_factory(100, ReminderStatus::Scheduled);
        assert!(!ctx
            .repos
            .reminders
            .set_status_if(&unknown.id, ReminderStatus::Scheduled, ReminderStatus::Sent, 150)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn finds_reminders_by_owner() {
        let ctx = ChimeContext::create_inmemory();
        let mut late = reminder_factory(200, ReminderStatus::Sent);
        let mut early = reminder_factory(100, ReminderStatus::Scheduled);
        let other = reminder_factory(50, ReminderStatus::Scheduled);
        let owner_id = chime_domain::ID::default();
        late.owner_id = owner_id.clone();
        early.owner_id = owner_id.clone();
        for reminder in [&late, &early, &other].iter() {
            ctx.repos.reminders.insert(reminder).await.unwrap();
        }

        let owned = ctx.repos.reminders.find_by_owner(&owner_id).await.unwrap();
        let owned_ids = owned.into_iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(owned_ids, vec![early.id.clone(), late.id.clone()]);
    }

    #[tokio::test]
    async fn save_and_delete_unknown_reminder() {
        let ctx = ChimeContext::create_inmemory();
        let reminder = reminder_factory(100, ReminderStatus::Scheduled);
        assert!(ctx.repos.reminders.save(&reminder).await.is_err());
        assert!(ctx.repos.reminders.delete(&reminder.id).await.is_none());

        ctx.repos.reminders.insert(&reminder).await.unwrap();
        assert!(ctx.repos.reminders.delete(&reminder.id).await.is_some());
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_none());
    }
}
