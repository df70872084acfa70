use crate::dtos::ReminderDTO;
use chime_domain::{RecurrenceDescriptor, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder, recurrence: Option<RecurrenceDescriptor>) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder, recurrence),
        }
    }
}

/// Enum values are given as plain strings. Unknown values fall back to a
/// default instead of failing the request.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRepeatBody {
    pub interval: i64,
    pub frequency: String,
    #[serde(default)]
    pub days_of_week: Vec<String>,
}

pub mod create_reminder {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        #[serde(default)]
        pub message: String,
        #[serde(default, rename = "type")]
        pub kind: Option<String>,
        pub fire_at: i64,
        pub channels: Vec<String>,
        #[serde(default)]
        pub repeat: Option<String>,
        #[serde(default)]
        pub custom_repeat: Option<CustomRepeatBody>,
        #[serde(default)]
        pub contact_id: Option<ID>,
        #[serde(default)]
        pub group_id: Option<ID>,
        /// Missing or unknown values mean `scheduled`
        #[serde(default)]
        pub status: Option<String>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub reminders: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<(Reminder, Option<RecurrenceDescriptor>)>) -> Self {
            Self {
                reminders: reminders
                    .into_iter()
                    .map(|(reminder, recurrence)| ReminderDTO::new(reminder, recurrence))
                    .collect(),
            }
        }
    }
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod update_reminder {
    use super::*;

    /// Absent fields keep their current value
    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default, rename = "type")]
        pub kind: Option<String>,
        #[serde(default)]
        pub fire_at: Option<i64>,
        #[serde(default)]
        pub status: Option<String>,
        #[serde(default)]
        pub channels: Option<Vec<String>>,
        #[serde(default)]
        pub repeat: Option<String>,
        #[serde(default)]
        pub custom_repeat: Option<CustomRepeatBody>,
        #[serde(default)]
        pub contact_id: Option<ID>,
        #[serde(default)]
        pub group_id: Option<ID>,
    }

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod update_reminder_status {
    use super::*;

    #[derive(Debug, Default, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        /// Missing or unknown values reset the reminder to `scheduled`
        #[serde(default)]
        pub status: Option<String>,
    }

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}
