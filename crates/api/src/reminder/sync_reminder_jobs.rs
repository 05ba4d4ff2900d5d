use crate::shared::usecase::UseCase;
use chrono::NaiveDateTime;
use medimate_domain::{JobId, Medication, ReminderJob, ID};
use medimate_infra::MedimateContext;
use std::collections::HashSet;
use tracing::info;

/// What prompted the sync.
#[derive(Debug)]
pub enum SyncTrigger {
    /// A single medication was created, updated or deleted. Only its jobs
    /// are touched.
    MedicationModified(ID),
    /// Periodic resync. Rebuilds the whole registry from the medication
    /// store.
    JobScheduler,
}

/// Reconciles the job registry with the medication store so that every
/// (medication, time) pair with reminders enabled has exactly one scheduled
/// job.
#[derive(Debug)]
pub struct SyncReminderJobsUseCase {
    pub trigger: SyncTrigger,
}

#[derive(Debug, PartialEq)]
pub struct UseCaseResponse {
    pub created: usize,
    pub removed: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncReminderJobsUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncReminderJobs";

    async fn execute(&mut self, ctx: &MedimateContext) -> Result<Self::Response, Self::Error> {
        match &self.trigger {
            SyncTrigger::MedicationModified(medication_id) => {
                let medication = ctx.repos.medications.find(medication_id).await;
                let removed = ctx
                    .job_registry
                    .remove_by(|job| job.id.medication_id == *medication_id);

                let mut created = 0;
                if let Some(medication) = medication {
                    if medication.reminders {
                        for job in build_jobs(&medication, ctx.sys.get_datetime()) {
                            ctx.job_registry.upsert(job);
                            created += 1;
                        }
                    }
                }

                info!(
                    "Synced reminder jobs for medication: {}, created: {}, removed: {}",
                    medication_id, created, removed
                );
                Ok(UseCaseResponse { created, removed })
            }
            SyncTrigger::JobScheduler => {
                // If the store is unreachable the registry is left as it is,
                // a failed resync must not wipe the schedule.
                let medications = ctx
                    .repos
                    .medications
                    .find_all_with_reminders()
                    .await
                    .map_err(|_| UseCaseError::StorageError)?;

                let now = ctx.sys.get_datetime();
                let mut desired = HashSet::new();
                let mut created = 0;
                for medication in &medications {
                    for job in build_jobs(medication, now) {
                        desired.insert(job.id.clone());
                        ctx.job_registry.upsert(job);
                        created += 1;
                    }
                }
                let removed = ctx.job_registry.remove_by(|job| !desired.contains(&job.id));

                info!(
                    "Resynced all reminder jobs, scheduled: {}, removed: {}",
                    created, removed
                );
                Ok(UseCaseResponse { created, removed })
            }
        }
    }
}

/// One job per distinct reminder time that still has a future occurrence.
fn build_jobs(medication: &Medication, now: NaiveDateTime) -> Vec<ReminderJob> {
    let mut jobs: Vec<ReminderJob> = Vec::new();
    for time in &medication.times {
        let job_id = JobId::new(medication.user_id.clone(), medication.id.clone(), *time);
        if jobs.iter().any(|job| job.id == job_id) {
            continue;
        }
        if let Some(next) = medication.next_fire_at(*time, now) {
            jobs.push(ReminderJob::new(job_id, next.and_utc().timestamp_millis()));
        }
    }
    jobs
}
