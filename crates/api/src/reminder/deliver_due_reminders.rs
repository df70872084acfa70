use crate::shared::usecase::UseCase;
use chime_domain::{Reminder, ReminderStatus};
use chime_infra::{
    notification::{DispatchError, DispatchOutcome},
    ChimeContext,
};
use tracing::{error, info, warn};

/// Counts of what happened to the due reminders of a single tick
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
    /// Marked as sent although the fallback swallowed the dispatch
    pub suppressed: usize,
    pub persistence_errors: usize,
    /// Paused, rescheduled or deleted while being dispatched
    pub superseded: usize,
}

/// One tick of the reminder clock. Every scheduled `Reminder` whose fire
/// time has passed is dispatched and moved to `sent` or `failed`, one
/// after the other.
#[derive(Debug)]
pub struct DeliverDueRemindersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverDueRemindersUseCase {
    type Response = DeliveryReport;

    type Error = UseCaseError;

    const NAME: &'static str = "DeliverDueReminders";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let due = ctx
            .repos
            .reminders
            .find_due(ReminderStatus::Scheduled, now)
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?;

        let mut report = DeliveryReport::default();
        for reminder in due {
            deliver(reminder, ctx, &mut report).await;
        }

        if report != DeliveryReport::default() {
            info!("Reminder clock tick done: {:?}", report);
        }
        Ok(report)
    }
}

async fn deliver(mut reminder: Reminder, ctx: &ChimeContext, report: &mut DeliveryReport) {
    let res = ctx.notifier.send(&reminder).await;
    let now = ctx.sys.get_timestamp_millis();

    let mut suppressed = false;
    match res {
        Ok(DispatchOutcome::Delivered) => {
            reminder.mark_sent(now);
        }
        Ok(DispatchOutcome::Suppressed { reason }) => {
            warn!(
                "Reminder {} is marked as sent without being delivered: {}",
                reminder.id, reason
            );
            suppressed = true;
            reminder.mark_sent(now);
        }
        Err(e) => {
            log_dispatch_error(&reminder, &e);
            reminder.mark_failed(now);
        }
    };

    // Only the transition is stored. Changes made while the dispatch was in
    // flight win over it.
    let stored = ctx
        .repos
        .reminders
        .set_status_if(&reminder.id, ReminderStatus::Scheduled, reminder.status, now)
        .await;
    match stored {
        Ok(true) => (),
        Ok(false) => {
            info!(
                "Reminder {} changed during dispatch, status {} is not stored",
                reminder.id, reminder.status
            );
            report.superseded += 1;
            return;
        }
        Err(e) => {
            error!(
                "Unable to store status {} for reminder {}: {:?}",
                reminder.status, reminder.id, e
            );
            report.persistence_errors += 1;
            return;
        }
    }

    match reminder.status {
        ReminderStatus::Sent if suppressed => report.suppressed += 1,
        ReminderStatus::Sent => report.sent += 1,
        ReminderStatus::Failed => report.failed += 1,
        _ => (),
    }
}

fn log_dispatch_error(reminder: &Reminder, e: &DispatchError) {
    match e {
        DispatchError::CircuitOpen { name } => error!(
            "Reminder {} failed, circuit breaker {} is open",
            reminder.id, name
        ),
        e => error!("Reminder {} failed: {}", reminder.id, e),
    }
}
