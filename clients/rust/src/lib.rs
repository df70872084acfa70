mod base;
mod reminder;
mod status;
mod user;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
pub use chime_api_structs::dtos::*;
pub use chime_api_structs::CustomRepeatBody;
pub use chime_domain::{
    NotificationChannel, ReminderKind, ReminderStatus, RepeatFrequency, RepeatType, Weekday, ID,
};
use reminder::ReminderClient;
pub use reminder::{CreateReminderInput, UpdateReminderInput, UpdateReminderStatusInput};
use status::StatusClient;
use std::sync::Arc;
use user::UserClient;
pub use user::CreateUserInput;

// Domain
pub use chime_api_structs::dtos::RecurrenceDTO as Recurrence;
pub use chime_api_structs::dtos::ReminderDTO as Reminder;
pub use chime_api_structs::dtos::UserDTO as User;

/// Chime Server SDK
///
/// The SDK contains methods for interacting with the Chime server API.
#[derive(Clone)]
pub struct ChimeSDK {
    pub reminder: ReminderClient,
    pub status: StatusClient,
    pub user: UserClient,
}

impl ChimeSDK {
    pub fn new<T: Into<String>>(address: String, api_key: T) -> Self {
        let mut base = BaseClient::new(address);
        base.set_api_key(api_key.into());
        Self::from_base(base)
    }

    /// Client without an api key, only able to check health and create users
    pub fn anonymous(address: String) -> Self {
        Self::from_base(BaseClient::new(address))
    }

    fn from_base(base: BaseClient) -> Self {
        let base = Arc::new(base);
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base.clone());
        let user = UserClient::new(base);

        Self {
            reminder,
            status,
            user,
        }
    }
}
