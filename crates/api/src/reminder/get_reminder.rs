use crate::{
    error::ChimeError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use chime_api_structs::get_reminder::*;
use chime_domain::{RecurrenceDescriptor, Reminder, ID};
use chime_infra::ChimeContext;

fn handle_error(e: UseCaseError) -> ChimeError {
    match e {
        UseCaseError::NotFound(reminder_id) => ChimeError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            reminder_id
        )),
    }
}

pub async fn get_reminder_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetReminderUseCase {
        user_id: user.id,
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|(reminder, recurrence)| HttpResponse::Ok().json(APIResponse::new(reminder, recurrence)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetReminderUseCase {
    pub user_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderUseCase {
    type Response = (Reminder, Option<RecurrenceDescriptor>);

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminder";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) if reminder.owner_id == self.user_id => reminder,
            _ => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };
        let recurrence = match &reminder.recurrence_id {
            Some(recurrence_id) => ctx.repos.recurrences.find(recurrence_id).await,
            None => None,
        };

        Ok((reminder, recurrence))
    }
}
