use crate::{APIResponse, BaseClient};
use chime_api_structs::*;
use chime_domain::{NotificationChannel, ReminderKind, ReminderStatus, RepeatType, ID};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct CreateReminderInput {
    pub title: String,
    pub message: String,
    pub kind: ReminderKind,
    pub fire_at: i64,
    pub channels: Vec<NotificationChannel>,
    pub repeat: RepeatType,
    pub custom_repeat: Option<CustomRepeatBody>,
    pub contact_id: Option<ID>,
    pub group_id: Option<ID>,
    /// Defaults to `ReminderStatus::Scheduled` on the server
    pub status: Option<ReminderStatus>,
}

#[derive(Default)]
pub struct UpdateReminderInput {
    pub reminder_id: ID,
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<ReminderKind>,
    pub fire_at: Option<i64>,
    pub status: Option<ReminderStatus>,
    pub channels: Option<Vec<NotificationChannel>>,
    pub repeat: Option<RepeatType>,
    pub custom_repeat: Option<CustomRepeatBody>,
    pub contact_id: Option<ID>,
    pub group_id: Option<ID>,
}

pub struct UpdateReminderStatusInput {
    pub reminder_id: ID,
    pub status: ReminderStatus,
}

fn channel_strings(channels: &[NotificationChannel]) -> Vec<String> {
    channels.iter().map(|c| c.to_string()).collect()
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            title: input.title,
            message: input.message,
            kind: Some(input.kind.to_string()),
            fire_at: input.fire_at,
            channels: channel_strings(&input.channels),
            repeat: Some(input.repeat.to_string()),
            custom_repeat: input.custom_repeat,
            contact_id: input.contact_id,
            group_id: input.group_id,
            status: input.status.map(|status| status.to_string()),
        };

        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    pub async fn list(&self) -> APIResponse<get_reminders::APIResponse> {
        self.base.get("reminders".into(), StatusCode::OK).await
    }

    pub async fn get(&self, reminder_id: ID) -> APIResponse<get_reminder::APIResponse> {
        self.base
            .get(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateReminderInput,
    ) -> APIResponse<update_reminder::APIResponse> {
        let body = update_reminder::RequestBody {
            title: input.title,
            message: input.message,
            kind: input.kind.map(|kind| kind.to_string()),
            fire_at: input.fire_at,
            status: input.status.map(|status| status.to_string()),
            channels: input.channels.as_deref().map(channel_strings),
            repeat: input.repeat.map(|repeat| repeat.to_string()),
            custom_repeat: input.custom_repeat,
            contact_id: input.contact_id,
            group_id: input.group_id,
        };

        self.base
            .put(
                body,
                format!("reminders/{}", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn update_status(
        &self,
        input: UpdateReminderStatusInput,
    ) -> APIResponse<update_reminder_status::APIResponse> {
        let body = update_reminder_status::RequestBody {
            status: Some(input.status.to_string()),
        };

        self.base
            .put(
                body,
                format!("reminders/{}/status", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, reminder_id: ID) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }
}
