use crate::shared::entity::{Entity, ID};
use crate::user::User;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Upper bound on the day-by-day search for the next occurrence. Guarantees
/// termination when the weekday set never matches any future date.
const MAX_DAYS_AHEAD: usize = 400;

/// A wall-clock reminder time, minute granularity, server-local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    pub hours: u32,
    pub minutes: u32,
}

impl ClockTime {
    pub fn new(hours: u32, minutes: u32) -> Result<Self, InvalidClockTimeError> {
        if hours > 23 || minutes > 59 {
            return Err(InvalidClockTimeError::OutOfRange(hours, minutes));
        }
        Ok(Self { hours, minutes })
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        // Fields are range-checked on construction
        NaiveTime::from_hms_opt(self.hours, self.minutes, 0).unwrap_or_default()
    }
}

#[derive(Error, Debug)]
pub enum InvalidClockTimeError {
    #[error("Clock time: {0} is malformed, expected HH:MM")]
    Malformed(String),
    #[error("Clock time out of range: {0}:{1}")]
    OutOfRange(u32, u32),
}

impl FromStr for ClockTime {
    type Err = InvalidClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(':').collect::<Vec<_>>();
        if parts.len() != 2 {
            return Err(InvalidClockTimeError::Malformed(s.to_string()));
        }
        let hours = parts[0]
            .parse::<u32>()
            .map_err(|_| InvalidClockTimeError::Malformed(s.to_string()))?;
        let minutes = parts[1]
            .parse::<u32>()
            .map_err(|_| InvalidClockTimeError::Malformed(s.to_string()))?;
        ClockTime::new(hours, minutes)
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

impl Serialize for ClockTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ClockTimeVisitor;

        impl<'de> Visitor<'de> for ClockTimeVisitor {
            type Value = ClockTime;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A clock time in HH:MM form")
            }

            fn visit_str<E>(self, value: &str) -> Result<ClockTime, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<ClockTime>()
                    .map_err(|e| E::custom(e.to_string()))
            }
        }

        deserializer.deserialize_str(ClockTimeVisitor)
    }
}

/// A medication as stored by the medication store. The scheduler holds a
/// read-only snapshot per refresh and never writes back.
#[derive(Debug, Clone)]
pub struct Medication {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub dosage: String,
    pub frequency: Option<String>,
    /// Daily reminder times. Duplicates are allowed but collapse into a
    /// single job per time.
    pub times: Vec<ClockTime>,
    /// Weekdays the medication is taken on. Empty means every day.
    pub days: Vec<Weekday>,
    pub start_date: NaiveDate,
    /// Inclusive. `None` means open-ended.
    pub end_date: Option<NaiveDate>,
    pub reminders: bool,
    pub instructions: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl Medication {
    /// Whether reminders for this medication are eligible to fire on `date`
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        if let Some(end_date) = self.end_date {
            if date > end_date {
                return false;
            }
        }
        self.days.is_empty() || self.days.contains(&date.weekday())
    }

    pub fn next_fire_at(&self, time: ClockTime, now: NaiveDateTime) -> Option<NaiveDateTime> {
        next_fire_at(time, &self.days, self.start_date, self.end_date, now)
    }
}

impl Entity for Medication {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// The first moment strictly after `now` at which a daily reminder with the
/// given clock time and calendar constraints should fire. `None` when the
/// active window has closed or no eligible date exists within the search
/// bound.
pub fn next_fire_at(
    time: ClockTime,
    days: &[Weekday],
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let time_of_day = time.as_naive_time();
    let mut date = if now.date() < start_date {
        start_date
    } else {
        now.date()
    };

    for _ in 0..MAX_DAYS_AHEAD {
        if let Some(end_date) = end_date {
            if date > end_date {
                return None;
            }
        }
        let candidate = date.and_time(time_of_day);
        let weekday_allowed = days.is_empty() || days.contains(&date.weekday());
        if weekday_allowed && candidate > now {
            return Some(candidate);
        }
        date = date.succ_opt()?;
    }

    None
}

/// Builds the SMS body for one reminder, matching the wording users already
/// get from the app.
pub fn compose_reminder_sms(user: &User, medication: &Medication, time: ClockTime) -> String {
    let mut message = format!(
        "Hi {}, it's time to take your {}",
        user.full_name(),
        medication.name
    );
    if !medication.dosage.is_empty() {
        message.push_str(&format!(" ({})", medication.dosage));
    }
    message.push_str(&format!(" at {}.", time));
    if let Some(instructions) = &medication.instructions {
        if !instructions.is_empty() {
            message.push_str(&format!(" {}.", instructions));
        }
    }
    message.push_str(" Take your medicine and be healthy!");
    message
}
