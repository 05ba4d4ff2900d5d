mod inmemory;
mod mongo;

use medimate_domain::{Medication, ID};

pub use inmemory::InMemoryMedicationRepo;
pub use mongo::MedicationRepo;

#[async_trait::async_trait]
pub trait IMedicationRepo: Send + Sync {
    async fn insert(&self, medication: &Medication) -> anyhow::Result<()>;
    async fn save(&self, medication: &Medication) -> anyhow::Result<()>;
    async fn find(&self, medication_id: &ID) -> Option<Medication>;
    async fn find_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Medication>>;
    /// All medications with reminders enabled, across users. Errors must
    /// surface so that a resync against an unreachable store can abort
    /// instead of wiping the schedule.
    async fn find_all_with_reminders(&self) -> anyhow::Result<Vec<Medication>>;
    async fn delete(&self, medication_id: &ID) -> Option<Medication>;
}
