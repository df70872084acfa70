mod quota;
mod reminder;
mod shared;
mod user;

pub use quota::{QuotaKey, QuotaLimits, QuotaLog, QuotaRule};
pub use reminder::{
    NotificationChannel, Reminder, ReminderKind, ReminderStatus, RenderedMessage, RepeatType,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::parse::{parse_enum_or, parse_enums, InvalidEnumValue};
pub use shared::recurrence::{RecurrenceDescriptor, RepeatFrequency, Weekday};
pub use user::User;
