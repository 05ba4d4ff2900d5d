use super::dtos::MedicationDTO;
use chrono::NaiveDate;
use medimate_domain::ID;
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguishes a field given as `null` from one left out entirely: the
/// outer `Option` stays `None` only when the field is absent.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

pub mod create_medication {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        #[serde(default)]
        pub dosage: Option<String>,
        #[serde(default)]
        pub frequency: Option<String>,
        /// Clock times in HH:MM form. Malformed entries are skipped.
        pub times: Vec<String>,
        /// Weekday names. Empty means every day.
        #[serde(default)]
        pub days: Vec<String>,
        #[serde(default)]
        pub start_date: Option<NaiveDate>,
        #[serde(default)]
        pub end_date: Option<NaiveDate>,
        #[serde(default = "default_reminders")]
        pub reminders: bool,
        #[serde(default)]
        pub instructions: Option<String>,
    }

    fn default_reminders() -> bool {
        true
    }

    pub type APIResponse = MedicationDTO;
}

pub mod get_medications {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub medications: Vec<MedicationDTO>,
    }
}

pub mod update_medication {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PathParams {
        pub medication_id: ID,
    }

    /// Fields left out are unchanged. `endDate` given as `null` clears the
    /// end date, making the medication open-ended.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub dosage: Option<String>,
        #[serde(default)]
        pub frequency: Option<String>,
        #[serde(default)]
        pub times: Option<Vec<String>>,
        #[serde(default)]
        pub days: Option<Vec<String>>,
        #[serde(default)]
        pub start_date: Option<NaiveDate>,
        #[serde(
            default,
            deserialize_with = "super::deserialize_present",
            skip_serializing_if = "Option::is_none"
        )]
        pub end_date: Option<Option<NaiveDate>>,
        #[serde(default)]
        pub reminders: Option<bool>,
        #[serde(default)]
        pub instructions: Option<String>,
    }

    pub type APIResponse = MedicationDTO;

    #[cfg(test)]
    mod test {
        use super::*;

        #[test]
        fn distinguishes_absent_end_date_from_null() {
            let body: RequestBody = serde_json::from_str("{}").unwrap();
            assert_eq!(body.end_date, None);

            let body: RequestBody = serde_json::from_str(r#"{"endDate":null}"#).unwrap();
            assert_eq!(body.end_date, Some(None));

            let body: RequestBody = serde_json::from_str(r#"{"endDate":"2025-06-01"}"#).unwrap();
            assert_eq!(
                body.end_date,
                Some(NaiveDate::from_ymd_opt(2025, 6, 1))
            );
        }
    }
}

pub mod delete_medication {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PathParams {
        pub medication_id: ID,
    }

    pub type APIResponse = MedicationDTO;
}
