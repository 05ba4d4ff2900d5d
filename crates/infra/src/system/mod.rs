use chrono::{LocalResult, NaiveDateTime, TimeZone, Utc};

/// Clock abstraction so that time dependent logic can be tested with a
/// frozen clock.
pub trait ISys: Send + Sync {
    fn get_timestamp_millis(&self) -> i64;

    /// The current server local datetime, derived from the timestamp.
    fn get_datetime(&self) -> NaiveDateTime {
        match Utc.timestamp_millis_opt(self.get_timestamp_millis()) {
            LocalResult::Single(dt) => dt.naive_utc(),
            _ => Utc::now().naive_utc(),
        }
    }
}

pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
