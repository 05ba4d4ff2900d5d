use super::create_medication::CreateMedicationUseCase;
use super::delete_medication::DeleteMedicationUseCase;
use super::update_medication::UpdateMedicationUseCase;
use crate::reminder::sync_reminder_jobs::{SyncReminderJobsUseCase, SyncTrigger};
use crate::shared::usecase::{execute, Subscriber};
use medimate_domain::Medication;
use medimate_infra::MedimateContext;

/// Keeps the job registry in step with the medication store after every
/// create, update and delete.
pub struct SyncRemindersOnMedicationChange;

impl SyncRemindersOnMedicationChange {
    async fn sync(&self, medication: &Medication, ctx: &MedimateContext) {
        let usecase = SyncReminderJobsUseCase {
            trigger: SyncTrigger::MedicationModified(medication.id.clone()),
        };
        // Failures are logged by the executor, the medication write itself
        // already succeeded
        let _ = execute(usecase, ctx).await;
    }
}

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateMedicationUseCase> for SyncRemindersOnMedicationChange {
    async fn notify(&self, medication: &Medication, ctx: &MedimateContext) {
        self.sync(medication, ctx).await;
    }
}

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateMedicationUseCase> for SyncRemindersOnMedicationChange {
    async fn notify(&self, medication: &Medication, ctx: &MedimateContext) {
        self.sync(medication, ctx).await;
    }
}

#[async_trait::async_trait(?Send)]
impl Subscriber<DeleteMedicationUseCase> for SyncRemindersOnMedicationChange {
    async fn notify(&self, medication: &Medication, ctx: &MedimateContext) {
        self.sync(medication, ctx).await;
    }
}
