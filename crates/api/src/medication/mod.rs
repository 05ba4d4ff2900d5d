mod create_medication;
mod delete_medication;
mod get_medications;
mod subscribers;
mod update_medication;

use actix_web::web;
use chrono::Weekday;
use create_medication::create_medication_controller;
use delete_medication::delete_medication_controller;
use get_medications::get_medications_controller;
use medimate_domain::ClockTime;
use tracing::warn;
use update_medication::update_medication_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/medications", web::post().to(create_medication_controller));
    cfg.route("/medications", web::get().to(get_medications_controller));
    cfg.route(
        "/medications/{medication_id}",
        web::put().to(update_medication_controller),
    );
    cfg.route(
        "/medications/{medication_id}",
        web::delete().to(delete_medication_controller),
    );
}

/// Parses the reminder times of a request body. Malformed entries are
/// skipped with a warning, duplicates collapse.
pub(crate) fn parse_times(raw_times: &[String]) -> Vec<ClockTime> {
    let mut times = Vec::new();
    for raw_time in raw_times {
        match raw_time.parse::<ClockTime>() {
            Ok(time) => {
                if !times.contains(&time) {
                    times.push(time);
                }
            }
            Err(e) => warn!("Skipping reminder time: {}", e),
        }
    }
    times
}

/// Same policy as `parse_times` for weekday names.
pub(crate) fn parse_days(raw_days: &[String]) -> Vec<Weekday> {
    let mut days = Vec::new();
    for raw_day in raw_days {
        match raw_day.parse::<Weekday>() {
            Ok(day) => {
                if !days.contains(&day) {
                    days.push(day);
                }
            }
            Err(_) => warn!("Skipping unknown weekday: {}", raw_day),
        }
    }
    days
}
