use crate::shared::{
    entity::{Entity, ID},
    parse::InvalidEnumValue,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Delivery state of a `Reminder`.
///
/// ```text
/// SCHEDULED --dispatch ok--> SENT
/// SCHEDULED --dispatch error--> FAILED
/// any --external status update--> any
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Scheduled,
    Sent,
    Paused,
    Failed,
}

impl ReminderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Sent => "sent",
            Self::Paused => "paused",
            Self::Failed => "failed",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(Self::Scheduled),
            "sent" => Ok(Self::Sent),
            "paused" => Ok(Self::Paused),
            "failed" => Ok(Self::Failed),
            _ => Err(InvalidEnumValue::new("status", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
    Whatsapp,
}

impl NotificationChannel {
    pub fn all() -> [NotificationChannel; 3] {
        [Self::Email, Self::Sms, Self::Whatsapp]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Whatsapp => "whatsapp",
        }
    }
}

impl Display for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationChannel {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "whatsapp" => Ok(Self::Whatsapp),
            _ => Err(InvalidEnumValue::new("channel", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    None,
    Hourly,
    Daily,
    Weekly,
    /// Repeats according to the `RecurrenceDescriptor` referenced by the `Reminder`
    Custom,
}

impl RepeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Custom => "custom",
        }
    }
}

impl Display for RepeatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RepeatType {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "custom" => Ok(Self::Custom),
            _ => Err(InvalidEnumValue::new("repeat", s)),
        }
    }
}

/// Whether the `Reminder` targets a single contact or a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Personal,
    Group,
}

impl ReminderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Group => "group",
        }
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderKind {
    type Err = InvalidEnumValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "group" => Ok(Self::Group),
            _ => Err(InvalidEnumValue::new("type", s)),
        }
    }
}

/// A `Reminder` is a message that should be pushed through its `channels`
/// at or after `fire_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The `User` who created this `Reminder`
    pub owner_id: ID,
    pub title: String,
    pub message: String,
    pub kind: ReminderKind,
    /// Timestamp in millis at which the `Reminder` becomes due
    pub fire_at: i64,
    pub status: ReminderStatus,
    /// Distinct channels, never empty
    pub channels: Vec<NotificationChannel>,
    pub repeat: RepeatType,
    /// Only set when `repeat` is `RepeatType::Custom`
    pub recurrence_id: Option<ID>,
    pub contact_id: Option<ID>,
    pub group_id: Option<ID>,
    pub created: i64,
    pub updated: i64,
}

impl Reminder {
    /// Due means scheduled and with a fire time at or before `now`
    pub fn is_due(&self, now: i64) -> bool {
        self.status == ReminderStatus::Scheduled && self.fire_at <= now
    }

    /// Replaces the channels of this `Reminder`, dropping duplicates.
    /// Returns false and leaves the `Reminder` untouched when no channel is given.
    pub fn set_channels(&mut self, channels: &[NotificationChannel]) -> bool {
        let mut distinct = Vec::with_capacity(channels.len());
        for channel in channels {
            if !distinct.contains(channel) {
                distinct.push(*channel);
            }
        }
        if distinct.is_empty() {
            return false;
        }
        self.channels = distinct;
        true
    }

    /// Successful delivery. Only a scheduled `Reminder` can be marked as sent.
    pub fn mark_sent(&mut self, now: i64) -> bool {
        self.transition_from_scheduled(ReminderStatus::Sent, now)
    }

    /// Failed delivery. Only a scheduled `Reminder` can be marked as failed.
    pub fn mark_failed(&mut self, now: i64) -> bool {
        self.transition_from_scheduled(ReminderStatus::Failed, now)
    }

    /// External status update. Pausing and re-scheduling go through here.
    pub fn set_status(&mut self, status: ReminderStatus, now: i64) {
        self.status = status;
        self.updated = now;
    }

    fn transition_from_scheduled(&mut self, status: ReminderStatus, now: i64) -> bool {
        if self.status != ReminderStatus::Scheduled {
            return false;
        }
        self.set_status(status, now);
        true
    }

    /// The payload handed to the sender of `channel`
    pub fn render(&self, channel: NotificationChannel) -> RenderedMessage {
        RenderedMessage {
            reminder_id: self.id.clone(),
            channel,
            title: self.title.clone(),
            body: self.message.clone(),
            contact_id: self.contact_id.clone(),
            group_id: self.group_id.clone(),
        }
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Content of a `Reminder` prepared for a single `NotificationChannel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub reminder_id: ID,
    pub channel: NotificationChannel,
    pub title: String,
    pub body: String,
    pub contact_id: Option<ID>,
    pub group_id: Option<ID>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn reminder_factory(fire_at: i64, status: ReminderStatus) -> Reminder {
        Reminder {
            id: Default::default(),
            owner_id: Default::default(),
            title: "Water the plants".into(),
            message: "The basil looks thirsty".into(),
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

    #[test]
    fn is_due_only_when_scheduled_and_fire_time_passed() {
        let reminder = reminder_factory(100, ReminderStatus::Scheduled);
        assert!(reminder.is_due(100));
        assert!(reminder.is_due(101));
        assert!(!reminder.is_due(99));

        for status in &[
            ReminderStatus::Sent,
            ReminderStatus::Paused,
            ReminderStatus::Failed,
        ] {
            let reminder = reminder_factory(100, *status);
            assert!(!reminder.is_due(1000));
        }
    }

    #[test]
    fn delivery_transitions_only_leave_scheduled() {
        let mut reminder = reminder_factory(0, ReminderStatus::Scheduled);
        assert!(reminder.mark_sent(10));
        assert_eq!(reminder.status, ReminderStatus::Sent);
        assert_eq!(reminder.updated, 10);

        assert!(!reminder.mark_failed(20));
        assert_eq!(reminder.status, ReminderStatus::Sent);
        assert_eq!(reminder.updated, 10);

        let mut reminder = reminder_factory(0, ReminderStatus::Paused);
        assert!(!reminder.mark_sent(10));
        assert_eq!(reminder.status, ReminderStatus::Paused);

        let mut reminder = reminder_factory(0, ReminderStatus::Scheduled);
        assert!(reminder.mark_failed(10));
        assert_eq!(reminder.status, ReminderStatus::Failed);
    }

    #[test]
    fn external_status_update_can_reschedule() {
        let mut reminder = reminder_factory(0, ReminderStatus::Failed);
        reminder.set_status(ReminderStatus::Scheduled, 5);
        assert!(reminder.is_due(5));
    }

    #[test]
    fn channels_are_distinct_and_non_empty() {
        let mut reminder = reminder_factory(0, ReminderStatus::Scheduled);
        assert!(!reminder.set_channels(&[]));
        assert_eq!(reminder.channels, vec![NotificationChannel::Email]);

        assert!(reminder.set_channels(&[
            NotificationChannel::Sms,
            NotificationChannel::Whatsapp,
            NotificationChannel::Sms,
        ]));
        assert_eq!(
            reminder.channels,
            vec![NotificationChannel::Sms, NotificationChannel::Whatsapp]
        );
    }

    #[test]
    fn renders_message_for_channel() {
        let reminder = reminder_factory(0, ReminderStatus::Scheduled);
        let message = reminder.render(NotificationChannel::Sms);
        assert_eq!(message.reminder_id, reminder.id);
        assert_eq!(message.channel, NotificationChannel::Sms);
        assert_eq!(message.body, reminder.message);
    }

    #[test]
    fn enum_strings_are_lowercase() {
        assert_eq!(ReminderStatus::Paused.to_string(), "paused");
        assert_eq!(NotificationChannel::Whatsapp.to_string(), "whatsapp");
        assert_eq!("WEEKLY".parse::<RepeatType>().unwrap(), RepeatType::Weekly);
        assert_eq!("Group".parse::<ReminderKind>().unwrap(), ReminderKind::Group);
        assert!("monthly".parse::<RepeatType>().is_err());
    }
}
