use super::IMedicationRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use chrono::{NaiveDate, Weekday};
use medimate_domain::{ClockTime, Medication, ID};
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

pub struct MedicationRepo {
    collection: Collection<MedicationMongo>,
}

impl MedicationRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("medications"),
        }
    }
}

#[async_trait::async_trait]
impl IMedicationRepo for MedicationRepo {
    async fn insert(&self, medication: &Medication) -> anyhow::Result<()> {
        mongo_repo::insert(&self.collection, medication).await
    }

    async fn save(&self, medication: &Medication) -> anyhow::Result<()> {
        mongo_repo::save(&self.collection, medication).await
    }

    async fn find(&self, medication_id: &ID) -> Option<Medication> {
        let filter = doc! {
            "_id": medication_id.as_string()
        };
        mongo_repo::find(&self.collection, filter).await
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Medication>> {
        let filter = doc! {
            "user_id": user_id.as_string()
        };
        mongo_repo::find_many(&self.collection, filter).await
    }

    async fn find_all_with_reminders(&self) -> anyhow::Result<Vec<Medication>> {
        let filter = doc! {
            "reminders": true
        };
        mongo_repo::find_many(&self.collection, filter).await
    }

    async fn delete(&self, medication_id: &ID) -> Option<Medication> {
        let filter = doc! {
            "_id": medication_id.as_string()
        };
        mongo_repo::delete(&self.collection, filter).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MedicationMongo {
    _id: ID,
    user_id: ID,
    name: String,
    dosage: String,
    frequency: Option<String>,
    times: Vec<ClockTime>,
    days: Vec<String>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    reminders: bool,
    instructions: Option<String>,
    created: i64,
    updated: i64,
}

impl MongoDocument<Medication> for MedicationMongo {
    fn to_domain(self) -> Medication {
        Medication {
            id: self._id,
            user_id: self.user_id,
            name: self.name,
            dosage: self.dosage,
            frequency: self.frequency,
            times: self.times,
            // Unknown weekday names in stored documents are dropped
            days: self
                .days
                .iter()
                .filter_map(|d| d.parse::<Weekday>().ok())
                .collect(),
            start_date: self.start_date,
            end_date: self.end_date,
            reminders: self.reminders,
            instructions: self.instructions,
            created: self.created,
            updated: self.updated,
        }
    }

    fn from_domain(medication: &Medication) -> Self {
        Self {
            _id: medication.id.clone(),
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

    fn id_filter(medication: &Medication) -> Document {
        doc! {
            "_id": medication.id.as_string()
        }
    }
}
