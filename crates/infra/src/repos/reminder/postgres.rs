use super::IReminderRepo;
use chime_domain::{
    parse_enum_or, parse_enums, NotificationChannel, Reminder, ReminderKind, ReminderStatus,
    RepeatType, ID,
};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    owner_uid: Uuid,
    title: String,
    message: String,
    kind: String,
    fire_at: i64,
    status: String,
    channels: Vec<String>,
    repeat: String,
    recurrence_uid: Option<Uuid>,
    contact_uid: Option<Uuid>,
    group_uid: Option<Uuid>,
    created: i64,
    updated: i64,
}

impl From<ReminderRaw> for Reminder {
    fn from(raw: ReminderRaw) -> Self {
        let channels: Vec<NotificationChannel> = parse_enums(&raw.channels);
        Self {
            id: raw.reminder_uid.into(),
            owner_id: raw.owner_uid.into(),
            title: raw.title,
            message: raw.message,
            kind: parse_enum_or(Some(raw.kind.as_str()), ReminderKind::Personal),
            fire_at: raw.fire_at,
            status: parse_enum_or(Some(raw.status.as_str()), ReminderStatus::Scheduled),
            channels,
            repeat: parse_enum_or(Some(raw.repeat.as_str()), RepeatType::None),
            recurrence_id: raw.recurrence_uid.map(ID::from),
            contact_id: raw.contact_uid.map(ID::from),
            group_id: raw.group_uid.map(ID::from),
            created: raw.created,
            updated: raw.updated,
        }
    }
}

fn channels_to_strings(reminder: &Reminder) -> Vec<String> {
    reminder
        .channels
        .iter()
        .map(|channel| channel.to_string())
        .collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, owner_uid, title, message, kind, fire_at, status, channels, repeat, recurrence_uid, contact_uid, group_uid, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.owner_id.inner_ref())
        .bind(&reminder.title)
        .bind(&reminder.message)
        .bind(reminder.kind.as_str())
        .bind(reminder.fire_at)
        .bind(reminder.status.as_str())
        .bind(channels_to_strings(reminder))
        .bind(reminder.repeat.as_str())
        .bind(reminder.recurrence_id.as_ref().map(|id| id.inner_ref()))
        .bind(reminder.contact_id.as_ref().map(|id| id.inner_ref()))
        .bind(reminder.group_id.as_ref().map(|id| id.inner_ref()))
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET title = $2,
            message = $3,
            kind = $4,
            fire_at = $5,
            status = $6,
            channels = $7,
            repeat = $8,
            recurrence_uid = $9,
            contact_uid = $10,
            group_uid = $11,
            updated = $12
            WHERE reminder_uid = $1
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.title)
        .bind(&reminder.message)
        .bind(reminder.kind.as_str())
        .bind(reminder.fire_at)
        .bind(reminder.status.as_str())
        .bind(channels_to_strings(reminder))
        .bind(reminder.repeat.as_str())
        .bind(reminder.recurrence_id.as_ref().map(|id| id.inner_ref()))
        .bind(reminder.contact_id.as_ref().map(|id| id.inner_ref()))
        .bind(reminder.group_id.as_ref().map(|id| id.inner_ref()))
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Reminder {} does not exist", reminder.id));
        }
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|reminder| reminder.into())
    }

    async fn find_due(&self, status: ReminderStatus, not_after: i64) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.status = $1 AND r.fire_at <= $2
            ORDER BY r.fire_at
            "#,
        )
        .bind(status.as_str())
        .bind(not_after)
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|reminder| reminder.into()).collect())
    }

    async fn find_by_owner(&self, owner_id: &ID) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.owner_uid = $1
            ORDER BY r.fire_at
            "#,
        )
        .bind(owner_id.inner_ref())
        .fetch_all(&self.pool)
        .await?;

        Ok(reminders.into_iter().map(|reminder| reminder.into()).collect())
    }

    async fn set_status_if(
        &self,
        reminder_id: &ID,
        from: ReminderStatus,
        to: ReminderStatus,
        updated: i64,
    ) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE reminders
            SET status = $3,
            updated = $4
            WHERE reminder_uid = $1 AND status = $2
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(updated)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders AS r
            WHERE r.reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|reminder| reminder.into())
    }
}
