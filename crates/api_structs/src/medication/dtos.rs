use chrono::NaiveDate;
use medimate_domain::{ClockTime, Medication, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationDTO {
    pub id: ID,
    pub user_id: ID,
    pub name: String,
    pub dosage: String,
    pub frequency: Option<String>,
    pub times: Vec<ClockTime>,
    pub days: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub reminders: bool,
    pub instructions: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl MedicationDTO {
    pub fn new(medication: &Medication) -> Self {
        Self {
            id: medication.id.clone(),
            user_id: medication.user_id.clone(),
            name: medication.name.clone(),
            dosage: medication.dosage.clone(),
            frequency: medication.frequency.clone(),
            times: medication.times.clone(),
            days: medication.days.iter().map(|d| d.to_string()).collect(),
            start_date: medication.start_date,
            end_date: medication.end_date,
            reminders: medication.reminders,
            instructions: medication.instructions.clone(),
            created: medication.created,
            updated: medication.updated,
        }
    }
}
