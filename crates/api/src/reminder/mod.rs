mod get_scheduled_jobs;
mod send_reminder;
pub mod sync_reminder_jobs;

use actix_web::web;
use get_scheduled_jobs::get_scheduled_jobs_controller;
use send_reminder::send_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/sms/scheduled-jobs",
        web::get().to(get_scheduled_jobs_controller),
    );
    cfg.route(
        "/sms/medication-reminder",
        web::post().to(send_reminder_controller),
    );
}
