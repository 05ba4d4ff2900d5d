mod medication;
mod reminder_job;
mod shared;
mod user;

pub use medication::{
    compose_reminder_sms, next_fire_at, ClockTime, InvalidClockTimeError, Medication,
};
pub use reminder_job::{InvalidJobIdError, JobId, ReminderJob};
pub use shared::entity::{Entity, ID};
pub use user::{compose_health_log_sms, User};
