use crate::{
    reminder::deliver_due_reminders::DeliverDueRemindersUseCase, shared::usecase::execute,
};
use chime_infra::ChimeContext;
use std::time::Duration;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

pub fn get_start_delay(now_ts: usize, secs_before_min: usize) -> usize {
    let secs_to_next_minute = 60 - (now_ts / 1000) % 60;
    if secs_to_next_minute > secs_before_min {
        secs_to_next_minute - secs_before_min
    } else {
        secs_to_next_minute + (60 - secs_before_min)
    }
}

/// Runs the reminder clock. The first tick happens at the start of the next
/// minute. A tick runs to completion before the next one starts and ticks
/// missed meanwhile are skipped.
pub fn start_reminder_clock(ctx: ChimeContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_next_run = get_start_delay(now as usize, 0);
        let start = Instant::now() + Duration::from_secs(secs_to_next_run as u64);
        info!(
            "Reminder clock starts in {} seconds with a period of {:?}",
            secs_to_next_run, ctx.config.reminder_clock_period
        );

        let mut clock = interval_at(start, ctx.config.reminder_clock_period);
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            clock.tick().await;
            // Errors are logged by execute, the clock keeps running
            let _ = execute(DeliverDueRemindersUseCase {}, &ctx).await;
        }
    });
}

/// Periodically drops quota logs that have been idle for longer than the
/// configured time. Nothing is started when idle logs are kept.
pub fn start_quota_sweep_job(ctx: ChimeContext) {
    let idle_secs = match ctx.config.quota.sweep_idle_secs() {
        Some(idle_secs) => idle_secs,
        None => return,
    };

    actix_web::rt::spawn(async move {
        let mut sweep_interval = interval(Duration::from_secs(idle_secs as u64));
        sweep_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            sweep_interval.tick().await;
            let now = ctx.sys.get_timestamp_secs();
            let removed = ctx.quota_store.sweep_idle(now, idle_secs);
            debug!("Removed {} idle quota logs", removed);
        }
    });
}
