use super::IMedicationRepo;
use crate::repos::shared::inmemory_repo;
use medimate_domain::{Medication, ID};
use std::sync::Mutex;

pub struct InMemoryMedicationRepo {
    medications: Mutex<Vec<Medication>>,
}

impl InMemoryMedicationRepo {
    pub fn new() -> Self {
        Self {
            medications: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryMedicationRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IMedicationRepo for InMemoryMedicationRepo {
    async fn insert(&self, medication: &Medication) -> anyhow::Result<()> {
        inmemory_repo::insert(medication, &self.medications)
    }

    async fn save(&self, medication: &Medication) -> anyhow::Result<()> {
        inmemory_repo::save(medication, &self.medications)
    }

    async fn find(&self, medication_id: &ID) -> Option<Medication> {
        inmemory_repo::find(medication_id, &self.medications)
    }

    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Medication>> {
        Ok(inmemory_repo::find_by(
            |m: &Medication| m.user_id == *user_id,
            &self.medications,
        ))
    }

    async fn find_all_with_reminders(&self) -> anyhow::Result<Vec<Medication>> {
        Ok(inmemory_repo::find_by(
            |m: &Medication| m.reminders,
            &self.medications,
        ))
    }

    async fn delete(&self, medication_id: &ID) -> Option<Medication> {
        inmemory_repo::delete(medication_id, &self.medications)
    }
}
