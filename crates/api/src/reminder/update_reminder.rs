use super::parse_custom_repeat;
use crate::{
    error::ChimeError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use chime_api_structs::update_reminder::*;
use chime_domain::{
    parse_enum_or, parse_enums, NotificationChannel, RecurrenceDescriptor, Reminder, RepeatType,
    ID,
};
use chime_infra::ChimeContext;

fn handle_error(e: UseCaseError) -> ChimeError {
    match e {
        UseCaseError::NotFound(reminder_id) => ChimeError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            reminder_id
        )),
        UseCaseError::NoValidChannel => {
            ChimeError::BadClientData("At least one valid channel must be given".into())
        }
        UseCaseError::StorageError => ChimeError::InternalError,
    }
}

pub async fn update_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    path_params: web::Path<PathParams>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = UpdateReminderUseCase {
        user_id: user.id,
        reminder_id: path_params.reminder_id.clone(),
        title: body.title,
        message: body.message,
        kind: body.kind,
        fire_at: body.fire_at,
        status: body.status,
        channels: body.channels,
        repeat: body.repeat,
        custom_repeat: body.custom_repeat.as_ref().and_then(parse_custom_repeat),
        contact_id: body.contact_id,
        group_id: body.group_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|(reminder, recurrence)| HttpResponse::Ok().json(APIResponse::new(reminder, recurrence)))
        .map_err(handle_error)
}

/// Updates a `Reminder` in place. Absent fields keep their value and
/// unknown enum values fall back to the current one. The recurrence is
/// the exception: it is replaced by the given custom recurrence, or dropped
/// when none is given. The old `RecurrenceDescriptor` is left unreferenced.
#[derive(Debug, Default)]
pub struct UpdateReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<String>,
    pub fire_at: Option<i64>,
    pub status: Option<String>,
    pub channels: Option<Vec<String>>,
    pub repeat: Option<String>,
    pub custom_repeat: Option<RecurrenceDescriptor>,
    pub contact_id: Option<ID>,
    pub group_id: Option<ID>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NoValidChannel,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = (Reminder, Option<RecurrenceDescriptor>);

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.owner_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        if let Some(channels) = &self.channels {
            let channels: Vec<NotificationChannel> = parse_enums(channels);
            if !reminder.set_channels(&channels) {
                return Err(UseCaseError::NoValidChannel);
            }
        }
        if let Some(title) = self.title.take() {
            reminder.title = title;
        }
        if let Some(message) = self.message.take() {
            reminder.message = message;
        }
        if let Some(fire_at) = self.fire_at {
            reminder.fire_at = fire_at;
        }
        if let Some(contact_id) = self.contact_id.take() {
            reminder.contact_id = Some(contact_id);
        }
        if let Some(group_id) = self.group_id.take() {
            reminder.group_id = Some(group_id);
        }
        reminder.kind = parse_enum_or(self.kind.as_deref(), reminder.kind);
        reminder.repeat = parse_enum_or(self.repeat.as_deref(), reminder.repeat);

        let mut new_recurrence = None;
        match (reminder.repeat, self.custom_repeat.take()) {
            (RepeatType::Custom, Some(recurrence)) => {
                ctx.repos
                    .recurrences
                    .insert(&recurrence)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                reminder.recurrence_id = Some(recurrence.id.clone());
                new_recurrence = Some(recurrence);
            }
            // Without a new descriptor the reminder keeps no recurrence
            _ => reminder.recurrence_id = None,
        }

        let now = ctx.sys.get_timestamp_millis();
        let status = parse_enum_or(self.status.as_deref(), reminder.status);
        reminder.set_status(status, now);

        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok((reminder, new_recurrence))
    }
}
