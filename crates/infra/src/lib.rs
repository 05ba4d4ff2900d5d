mod config;
mod job_registry;
mod repos;
mod services;
mod system;

pub use config::{Config, TwilioConfig};
pub use job_registry::JobRegistry;
pub use repos::{
    IMedicationRepo, IUserRepo, InMemoryMedicationRepo, InMemoryUserRepo, MedicationRepo, Repos,
    UserRepo,
};
pub use services::{
    normalize_phone_number, ISmsService, InMemorySmsService, SmsDelivery, SmsError, SmsMessage,
    TwilioSmsService,
};
pub use system::{ISys, RealSys};

use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct MedimateContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub sms: Arc<dyn ISmsService>,
    pub job_registry: Arc<JobRegistry>,
}

impl MedimateContext {
    pub fn new(repos: Repos, config: Config, sms: Arc<dyn ISmsService>) -> Self {
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            sms,
            job_registry: Arc::new(JobRegistry::new()),
        }
    }

    pub fn create_inmemory() -> Self {
        Self::new(
            Repos::create_inmemory(),
            Config::new(),
            Arc::new(InMemorySmsService::new()),
        )
    }
}

/// Assembles the application context from the environment. Falls back to the
/// in-memory store and the SMS logging stub when mongodb or Twilio are not
/// configured.
pub async fn setup_context() -> MedimateContext {
    let config = Config::new();

    let repos = match (
        std::env::var("MONGODB_CONNECTION_STRING"),
        std::env::var("MONGODB_NAME"),
    ) {
        (Ok(connection_string), Ok(db_name)) => {
            Repos::create_mongodb(&connection_string, &db_name)
                .await
                .expect("Mongodb credentials to be valid and the database to be accessible")
        }
        _ => {
            info!("Mongodb is not configured, using the inmemory store");
            Repos::create_inmemory()
        }
    };

    let sms: Arc<dyn ISmsService> = match &config.twilio {
        Some(twilio) => Arc::new(TwilioSmsService::new(twilio.clone())),
        None => {
            info!("Twilio is not configured, SMS messages will only be logged");
            Arc::new(InMemorySmsService::new())
        }
    };

    MedimateContext::new(repos, config, sms)
}
