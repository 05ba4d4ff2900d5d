use medimate_domain::ClockTime;
use medimate_utils::create_random_secret;
use tracing::warn;

/// Credentials for the Twilio messaging API. All three values are required
/// before real SMS delivery is enabled.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub phone_number: String,
}

impl TwilioConfig {
    fn from_env() -> Option<Self> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN").ok()?;
        let phone_number = std::env::var("TWILIO_PHONE_NUMBER").ok()?;
        Some(Self {
            account_sid,
            auth_token,
            phone_number,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: usize,
    /// Secret used to verify the bearer tokens issued by the account system.
    pub jwt_secret: String,
    pub twilio: Option<TwilioConfig>,
    /// How often the dispatch loop checks the registry for due jobs.
    pub reminder_poll_interval_secs: u64,
    /// How often all jobs are rebuilt from the medication store.
    pub job_resync_interval_secs: u64,
    /// Clock time of the daily health-log reminder broadcast.
    pub health_log_reminder_time: ClockTime,
}

impl Config {
    pub fn new() -> Self {
        let port = std::env::var("PORT").unwrap_or_else(|_| "5000".into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, using the default port: 5000",
                    port
                );
                5000
            }
        };

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                warn!("JWT_SECRET is not set, sessions will not survive a restart");
                create_random_secret(16)
            }
        };

        let twilio = TwilioConfig::from_env();

        let reminder_poll_interval_secs = env_interval("REMINDER_POLL_INTERVAL_SECS", 30);
        let job_resync_interval_secs = env_interval("JOB_RESYNC_INTERVAL_SECS", 300);

        let default_health_log_time = ClockTime {
            hours: 9,
            minutes: 0,
        };
        let health_log_reminder_time = match std::env::var("HEALTH_LOG_REMINDER_TIME") {
            Ok(raw) => match raw.parse::<ClockTime>() {
                Ok(time) => time,
                Err(_) => {
                    warn!(
                        "The given HEALTH_LOG_REMINDER_TIME: {} is not valid, using the default: {}",
                        raw, default_health_log_time
                    );
                    default_health_log_time
                }
            },
            Err(_) => default_health_log_time,
        };

        Self {
            port,
            jwt_secret,
            twilio,
            reminder_poll_interval_secs,
            job_resync_interval_secs,
            health_log_reminder_time,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn env_interval(var: &str, default: u64) -> u64 {
    match std::env::var(var) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given {}: {} is not valid, using the default: {}",
                    var, raw, default
                );
                default
            }
        },
        Err(_) => default,
    }
}
