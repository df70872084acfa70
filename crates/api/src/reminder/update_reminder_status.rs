use crate::{
    error::ChimeError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use chime_api_structs::update_reminder_status::*;
use chime_domain::{parse_enum_or, RecurrenceDescriptor, Reminder, ReminderStatus, ID};
use chime_infra::ChimeContext;

fn handle_error(e: UseCaseError) -> ChimeError {
    match e {
        UseCaseError::NotFound(reminder_id) => ChimeError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            reminder_id
        )),
        UseCaseError::StorageError => ChimeError::InternalError,
    }
}

pub async fn update_reminder_status_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    path_params: web::Path<PathParams>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = UpdateReminderStatusUseCase {
        user_id: user.id,
        reminder_id: path_params.reminder_id.clone(),
        status: parse_enum_or(body.status.as_deref(), ReminderStatus::Scheduled),
    };

    execute(usecase, &ctx)
        .await
        .map(|(reminder, recurrence)| HttpResponse::Ok().json(APIResponse::new(reminder, recurrence)))
        .map_err(handle_error)
}

/// The only way out of `sent`, `failed` and `paused`. Setting a reminder
/// back to `scheduled` makes the clock pick it up again.
#[derive(Debug)]
pub struct UpdateReminderStatusUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
    pub status: ReminderStatus,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderStatusUseCase {
    type Response = (Reminder, Option<RecurrenceDescriptor>);

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminderStatus";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.owner_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };

        reminder.set_status(self.status, ctx.sys.get_timestamp_millis());
        ctx.repos
            .reminders
            .save(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let recurrence = match &reminder.recurrence_id {
            Some(recurrence_id) => ctx.repos.recurrences.find(recurrence_id).await,
            None => None,
        };
        Ok((reminder, recurrence))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::test_helpers::{insert_reminder, insert_user};
    use chime_domain::NotificationChannel;

    #[actix_web::main]
    #[test]
    async fn pauses_and_reschedules_reminder() {
        let ctx = ChimeContext::create_inmemory();
        let user = insert_user(&ctx, "alice", false).await;
        let reminder = insert_reminder(
            &ctx,
            &user,
            100,
            ReminderStatus::Failed,
            vec![NotificationChannel::Email],
        )
        .await;

        let mut usecase = UpdateReminderStatusUseCase {
            user_id: user.id.clone(),
            reminder_id: reminder.id.clone(),
            status: ReminderStatus::Paused,
        };
        let (updated, _) = usecase.execute(&ctx).await.unwrap();
        assert_eq!(updated.status, ReminderStatus::Paused);

        usecase.status = ReminderStatus::Scheduled;
        usecase.execute(&ctx).await.unwrap();
        let due = ctx
            .repos
            .reminders
            .find_due(ReminderStatus::Scheduled, 100)
            .await
            .unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, reminder.id);
    }
}
