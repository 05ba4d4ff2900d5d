use super::dtos::ReminderJobDTO;
use medimate_domain::ID;
use serde::{Deserialize, Serialize};

pub mod get_scheduled_jobs {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub jobs: Vec<ReminderJobDTO>,
        pub sms_available: bool,
    }
}

pub mod send_reminder {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub medication_id: ID,
        /// Clock time to mention in the message. Defaults to the current
        /// server time.
        #[serde(default)]
        pub time: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message_id: String,
    }
}
