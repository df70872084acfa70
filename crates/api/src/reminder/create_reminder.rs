use super::parse_custom_repeat;
use crate::{
    error::ChimeError,
    shared::{
        auth::protect_route,
        usecase::{execute_with_quota, QuotaLimited, UseCase},
    },
};
use actix_web::{web, HttpRequest, HttpResponse};
use chime_api_structs::create_reminder::*;
use chime_domain::{
    parse_enum_or, parse_enums, NotificationChannel, RecurrenceDescriptor, Reminder,
    ReminderKind, ReminderStatus, RepeatType, ID,
};
use chime_infra::ChimeContext;

pub async fn create_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let repeat = parse_enum_or(body.repeat.as_deref(), RepeatType::None);
    let usecase = CreateReminderUseCase {
        owner_id: user.id.clone(),
        title: body.title,
        message: body.message,
        kind: parse_enum_or(body.kind.as_deref(), ReminderKind::Personal),
        fire_at: body.fire_at,
        channels: parse_enums(&body.channels),
        repeat,
        custom_repeat: body.custom_repeat.as_ref().and_then(parse_custom_repeat),
        contact_id: body.contact_id,
        group_id: body.group_id,
        status: parse_enum_or(body.status.as_deref(), ReminderStatus::Scheduled),
    };

    execute_with_quota(usecase, &user, &ctx)
        .await
        .map(|(reminder, recurrence)| {
            HttpResponse::Created().json(APIResponse::new(reminder, recurrence))
        })
        .map_err(ChimeError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub owner_id: ID,
    pub title: String,
    pub message: String,
    pub kind: ReminderKind,
    pub fire_at: i64,
    pub channels: Vec<NotificationChannel>,
    pub repeat: RepeatType,
    /// Only stored when `repeat` is `RepeatType::Custom`
    pub custom_repeat: Option<RecurrenceDescriptor>,
    pub contact_id: Option<ID>,
    pub group_id: Option<ID>,
    pub status: ReminderStatus,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NoValidChannel,
    StorageError,
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NoValidChannel => Self::BadClientData(format!(
                "At least one valid channel must be given, valid channels are: {}",
                NotificationChannel::all()
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = (Reminder, Option<RecurrenceDescriptor>);

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let mut reminder = Reminder {
            id: Default::default(),
            owner_id: self.owner_id.clone(),
            title: self.title.clone(),
            message: self.message.clone(),
            kind: self.kind,
            fire_at: self.fire_at,
            status: self.status,
            channels: Vec::new(),
            repeat: self.repeat,
            recurrence_id: None,
            contact_id: self.contact_id.clone(),
            group_id: self.group_id.clone(),
            created: now,
            updated: now,
        };
        if !reminder.set_channels(&self.channels) {
            return Err(UseCaseError::NoValidChannel);
        }

        let recurrence = match (self.repeat, self.custom_repeat.take()) {
            (RepeatType::Custom, Some(recurrence)) => {
                ctx.repos
                    .recurrences
                    .insert(&recurrence)
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;
                reminder.recurrence_id = Some(recurrence.id.clone());
                Some(recurrence)
            }
            _ => None,
        };

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok((reminder, recurrence))
    }
}

impl QuotaLimited for CreateReminderUseCase {
    const QUOTA_RULE: &'static str = "createReminder";
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        reminder::test_helpers::insert_user,
        shared::{quota::QuotaError, usecase::UseCaseErrorContainer},
    };
    use chime_domain::{QuotaLimits, RepeatFrequency};

    fn usecase_factory(owner_id: ID) -> CreateReminderUseCase {
        CreateReminderUseCase {
            owner_id,
            title: "Dentist".into(),
            message: "Appointment at 10".into(),
            kind: ReminderKind::Personal,
            fire_at: 1000,
            channels: vec![NotificationChannel::Email, NotificationChannel::Email],
            repeat: RepeatType::None,
            custom_repeat: None,
            contact_id: None,
            group_id: None,
            status: ReminderStatus::Scheduled,
        }
    }

    fn inmemory_context_with_quota(max_requests: i64) -> ChimeContext {
        let mut ctx = ChimeContext::create_inmemory();
        ctx.config.quota.rules.insert(
            CreateReminderUseCase::QUOTA_RULE.into(),
            QuotaLimits::new(max_requests, 60),
        );
        ctx
    }

    #[actix_web::main]
    #[test]
    async fn creates_scheduled_reminder() {
        let ctx = ChimeContext::create_inmemory();
        let user = insert_user(&ctx, "alice", false).await;
        let mut usecase = usecase_factory(user.id.clone());

        let (reminder, recurrence) = usecase.execute(&ctx).await.unwrap();
        assert_eq!(reminder.status, ReminderStatus::Scheduled);
        assert_eq!(reminder.channels, vec![NotificationChannel::Email]);
        assert!(recurrence.is_none());
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn creates_reminder_with_given_status() {
        let ctx = ChimeContext::create_inmemory();
        let user = insert_user(&ctx, "alice", false).await;
        let mut usecase = usecase_factory(user.id.clone());
        usecase.status = parse_enum_or(Some("paused"), ReminderStatus::Scheduled);

        let (reminder, _) = usecase.execute(&ctx).await.unwrap();
        assert_eq!(reminder.status, ReminderStatus::Paused);
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.unwrap().status,
            ReminderStatus::Paused
        );
        // Only scheduled reminders are picked up by the clock
        let due = ctx
            .repos
            .reminders
            .find_due(ReminderStatus::Scheduled, i64::MAX)
            .await
            .unwrap();
        assert!(due.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn stores_custom_recurrence() {
        let ctx = ChimeContext::create_inmemory();
        let user = insert_user(&ctx, "alice", false).await;
        let mut usecase = usecase_factory(user.id.clone());
        usecase.repeat = RepeatType::Custom;
        usecase.custom_repeat = RecurrenceDescriptor::new(2, RepeatFrequency::Week, vec![]);

        let (reminder, recurrence) = usecase.execute(&ctx).await.unwrap();
        let recurrence = recurrence.unwrap();
        assert_eq!(reminder.recurrence_id, Some(recurrence.id.clone()));
        assert!(ctx.repos.recurrences.find(&recurrence.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn ignores_recurrence_unless_custom() {
        let ctx = ChimeContext::create_inmemory();
        let user = insert_user(&ctx, "alice", false).await;
        let mut usecase = usecase_factory(user.id.clone());
        usecase.repeat = RepeatType::Daily;
        usecase.custom_repeat = RecurrenceDescriptor::new(2, RepeatFrequency::Week, vec![]);

        let (reminder, recurrence) = usecase.execute(&ctx).await.unwrap();
        assert!(reminder.recurrence_id.is_none());
        assert!(recurrence.is_none());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_reminder_without_channels() {
        let ctx = ChimeContext::create_inmemory();
        let user = insert_user(&ctx, "alice", false).await;
        let mut usecase = usecase_factory(user.id.clone());
        usecase.channels = vec![];

        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NoValidChannel
        );
    }

    #[actix_web::main]
    #[test]
    async fn free_user_is_limited() {
        let ctx = inmemory_context_with_quota(3);
        let user = insert_user(&ctx, "u1", false).await;

        for _ in 0..3 {
            let res = execute_with_quota(usecase_factory(user.id.clone()), &user, &ctx).await;
            assert!(res.is_ok());
        }
        let res = execute_with_quota(usecase_factory(user.id.clone()), &user, &ctx).await;
        assert!(matches!(
            res,
            Err(UseCaseErrorContainer::Quota(QuotaError::QuotaExceeded { .. }))
        ));

        // The rejected call never reached the store
        let due = ctx
            .repos
            .reminders
            .find_due(ReminderStatus::Scheduled, i64::MAX)
            .await
            .unwrap();
        assert_eq!(due.len(), 3);
    }

    #[actix_web::main]
    #[test]
    async fn premium_user_is_not_limited() {
        let ctx = inmemory_context_with_quota(3);
        let user = insert_user(&ctx, "u1", true).await;

        for _ in 0..100 {
            let res = execute_with_quota(usecase_factory(user.id.clone()), &user, &ctx).await;
            assert!(res.is_ok());
        }
    }
}
