use crate::{
    error::ChimeError,
    shared::{
        auth::protect_route,
        usecase::{execute, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use chime_api_structs::get_reminders::*;
use chime_domain::{RecurrenceDescriptor, Reminder, ID};
use chime_infra::ChimeContext;

fn handle_error(e: UseCaseError) -> ChimeError {
    match e {
        UseCaseError::StorageError => ChimeError::InternalError,
    }
}

pub async fn get_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetRemindersUseCase { user_id: user.id };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(handle_error)
}

/// Every `Reminder` of the calling `User` together with its recurrence
#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<(Reminder, Option<RecurrenceDescriptor>)>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let reminders = ctx
            .repos
            .reminders
            .find_by_owner(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut res = Vec::with_capacity(reminders.len());
        for reminder in reminders {
            let recurrence = match &reminder.recurrence_id {
                Some(recurrence_id) => ctx.repos.recurrences.find(recurrence_id).await,
                None => None,
            };
            res.push((reminder, recurrence));
        }

        Ok(res)
    }
}
