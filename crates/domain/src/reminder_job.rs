use crate::medication::ClockTime;
use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Identifies one scheduled reminder job. The string form is
/// `medication_<userId>_<medicationId>_<HH:MM>`, which keeps jobs stable
/// across resyncs: the same (user, medication, time) triple always maps to
/// the same job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId {
    pub user_id: ID,
    pub medication_id: ID,
    pub time: ClockTime,
}

impl JobId {
    pub fn new(user_id: ID, medication_id: ID, time: ClockTime) -> Self {
        Self {
            user_id,
            medication_id,
            time,
        }
    }
}

impl Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "medication_{}_{}_{}",
            self.user_id, self.medication_id, self.time
        )
    }
}

#[derive(Error, Debug)]
pub enum InvalidJobIdError {
    #[error("Job id: {0} is malformed")]
    Malformed(String),
}

impl FromStr for JobId {
    type Err = InvalidJobIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || InvalidJobIdError::Malformed(s.to_string());
        let rest = s.strip_prefix("medication_").ok_or_else(malformed)?;
        let parts = rest.split('_').collect::<Vec<_>>();
        if parts.len() != 3 {
            return Err(malformed());
        }
        let user_id = parts[0].parse::<ID>().map_err(|_| malformed())?;
        let medication_id = parts[1].parse::<ID>().map_err(|_| malformed())?;
        let time = parts[2].parse::<ClockTime>().map_err(|_| malformed())?;
        Ok(Self::new(user_id, medication_id, time))
    }
}

impl TryFrom<String> for JobId {
    type Error = InvalidJobIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.to_string()
    }
}

/// One scheduled SMS reminder held by the in-process job registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderJob {
    pub id: JobId,
    /// Millisecond timestamp of the next planned delivery.
    pub next_run_at: i64,
    /// Stopped jobs stay visible in status queries until the next resync
    /// drops them.
    pub running: bool,
}

impl ReminderJob {
    pub fn new(id: JobId, next_run_at: i64) -> Self {
        Self {
            id,
            next_run_at,
            running: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_id_roundtrips_through_string() {
        let id = JobId::new(
            ID::new(),
            ID::new(),
            "14:30".parse().expect("Valid clock time"),
        );
        let parsed = id.to_string().parse::<JobId>().expect("Valid job id");
        assert_eq!(id, parsed);
    }

    #[test]
    fn job_id_has_expected_wire_form() {
        let user_id = ID::new();
        let medication_id = ID::new();
        let id = JobId::new(
            user_id.clone(),
            medication_id.clone(),
            "08:00".parse().expect("Valid clock time"),
        );
        assert_eq!(
            id.to_string(),
            format!("medication_{}_{}_08:00", user_id, medication_id)
        );
    }

    #[test]
    fn rejects_malformed_job_ids() {
        for raw in [
            "",
            "medication_",
            "medication_a_b_c",
            "event_11111111-1111-1111-1111-111111111111_22222222-2222-2222-2222-222222222222_08:00",
            "medication_11111111-1111-1111-1111-111111111111_08:00",
        ]
        .iter()
        {
            assert!(raw.parse::<JobId>().is_err(), "{} should be rejected", raw);
        }
    }
}
