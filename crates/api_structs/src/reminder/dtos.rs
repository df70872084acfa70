use chime_domain::{
    NotificationChannel, RecurrenceDescriptor, Reminder, ReminderKind, ReminderStatus,
    RepeatFrequency, RepeatType, Weekday, ID,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub owner_id: ID,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ReminderKind,
    pub fire_at: i64,
    pub status: ReminderStatus,
    pub channels: Vec<NotificationChannel>,
    pub repeat: RepeatType,
    pub custom_repeat: Option<RecurrenceDTO>,
    pub contact_id: Option<ID>,
    pub group_id: Option<ID>,
    pub created: i64,
    pub updated: i64,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder, recurrence: Option<RecurrenceDescriptor>) -> Self {
        Self {
            id: reminder.id,
            owner_id: reminder.owner_id,
            title: reminder.title,
            message: reminder.message,
            kind: reminder.kind,
            fire_at: reminder.fire_at,
            status: reminder.status,
            channels: reminder.channels,
            repeat: reminder.repeat,
            custom_repeat: recurrence.map(RecurrenceDTO::new),
            contact_id: reminder.contact_id,
            group_id: reminder.group_id,
            created: reminder.created,
            updated: reminder.updated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceDTO {
    pub id: ID,
    pub interval: u32,
    pub frequency: RepeatFrequency,
    pub days_of_week: Vec<Weekday>,
}

impl RecurrenceDTO {
    pub fn new(recurrence: RecurrenceDescriptor) -> Self {
        Self {
            id: recurrence.id,
            interval: recurrence.interval,
            frequency: recurrence.frequency,
            days_of_week: recurrence.days_of_week,
        }
    }
}
