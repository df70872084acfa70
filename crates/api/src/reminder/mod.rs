mod create_reminder;
mod delete_reminder;
pub mod deliver_due_reminders;
mod get_reminder;
mod get_reminders;
mod update_reminder;
mod update_reminder_status;

use actix_web::web;
use chime_api_structs::CustomRepeatBody;
use chime_domain::{parse_enum_or, RecurrenceDescriptor, RepeatFrequency, Weekday};
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_reminder::get_reminder_controller;
use get_reminders::get_reminders_controller;
use update_reminder::update_reminder_controller;
use update_reminder_status::update_reminder_status_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route(
        "/reminders/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}/status",
        web::put().to(update_reminder_status_controller),
    );
}

/// Returns `None` when the interval is not positive. An unknown frequency
/// means daily and an unknown weekday means monday.
pub fn parse_custom_repeat(body: &CustomRepeatBody) -> Option<RecurrenceDescriptor> {
    let frequency = parse_enum_or(Some(body.frequency.as_str()), RepeatFrequency::Day);
    let days_of_week = body
        .days_of_week
        .iter()
        .map(|day| parse_enum_or(Some(day.as_str()), Weekday::Mon))
        .collect();
    RecurrenceDescriptor::new(body.interval, frequency, days_of_week)
}
