use medimate_domain::{ClockTime, ReminderJob, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderJobDTO {
    pub id: String,
    pub medication_id: ID,
    pub time: ClockTime,
    /// Millisecond timestamp of the next planned delivery.
    pub next_date: i64,
    pub running: bool,
}

impl ReminderJobDTO {
    pub fn new(job: &ReminderJob) -> Self {
        Self {
            id: job.id.to_string(),
            medication_id: job.id.medication_id.clone(),
            time: job.id.time,
            next_date: job.next_run_at,
            running: job.running,
        }
    }
}
