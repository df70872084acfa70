use super::IRecurrenceRepo;
use chime_domain::{parse_enum_or, parse_enums, RecurrenceDescriptor, RepeatFrequency, Weekday, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresRecurrenceRepo {
    pool: PgPool,
}

impl PostgresRecurrenceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RecurrenceRaw {
    recurrence_uid: Uuid,
    interval: i32,
    frequency: String,
    days_of_week: Vec<String>,
}

impl From<RecurrenceRaw> for RecurrenceDescriptor {
    fn from(raw: RecurrenceRaw) -> Self {
        let mut days_of_week: Vec<Weekday> = parse_enums(&raw.days_of_week);
        days_of_week.sort();
        Self {
            id: raw.recurrence_uid.into(),
            interval: raw.interval.max(1) as u32,
            frequency: parse_enum_or(Some(raw.frequency.as_str()), RepeatFrequency::Day),
            days_of_week,
        }
    }
}

#[async_trait::async_trait]
impl IRecurrenceRepo for PostgresRecurrenceRepo {
    async fn insert(&self, recurrence: &RecurrenceDescriptor) -> anyhow::Result<()> {
        let days_of_week = recurrence
            .days_of_week
            .iter()
            .map(|day| day.to_string())
            .collect::<Vec<_>>();
        sqlx::query(
            r#"
            INSERT INTO recurrences(recurrence_uid, interval, frequency, days_of_week)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(recurrence.id.inner_ref())
        .bind(recurrence.interval.min(i32::MAX as u32) as i32)
        .bind(recurrence.frequency.to_string())
        .bind(&days_of_week)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, recurrence_id: &ID) -> Option<RecurrenceDescriptor> {
        sqlx::query_as::<_, RecurrenceRaw>(
            r#"
            SELECT * FROM recurrences AS r
            WHERE r.recurrence_uid = $1
            "#,
        )
        .bind(recurrence_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|recurrence| recurrence.into())
    }

    async fn delete(&self, recurrence_id: &ID) -> Option<RecurrenceDescriptor> {
        sqlx::query_as::<_, RecurrenceRaw>(
            r#"
            DELETE FROM recurrences AS r
            WHERE r.recurrence_uid = $1
            RETURNING *
            "#,
        )
        .bind(recurrence_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(|recurrence| recurrence.into())
    }
}
