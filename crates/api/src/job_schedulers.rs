use crate::reminder::sync_reminder_jobs::{SyncReminderJobsUseCase, SyncTrigger};
use crate::shared::usecase::execute;
use actix_web::rt;
use medimate_domain::{compose_health_log_sms, compose_reminder_sms, next_fire_at, ReminderJob};
use medimate_infra::{MedimateContext, SmsMessage};
use std::time::Duration;
use tracing::{error, info, warn};

/// Periodically rebuilds every reminder job from the medication store. The
/// first tick fires right away and doubles as the initial load on startup.
pub fn start_job_sync_scheduler(ctx: MedimateContext) {
    rt::spawn(async move {
        let mut interval =
            rt::time::interval(Duration::from_secs(ctx.config.job_resync_interval_secs));
        loop {
            interval.tick().await;
            let usecase = SyncReminderJobsUseCase {
                trigger: SyncTrigger::JobScheduler,
            };
            let _ = execute(usecase, &ctx).await;
        }
    });
}

/// Polls the registry for due jobs and dispatches them.
pub fn start_reminder_dispatch_job(ctx: MedimateContext) {
    rt::spawn(async move {
        let mut interval =
            rt::time::interval(Duration::from_secs(ctx.config.reminder_poll_interval_secs));
        loop {
            interval.tick().await;
            let now = ctx.sys.get_timestamp_millis();
            for job in ctx.job_registry.pop_due(now) {
                let ctx = ctx.clone();
                rt::spawn(async move {
                    fire_reminder(job, &ctx).await;
                });
            }
        }
    });
}

/// Sends the daily health-log nudge at the configured clock time. Runs on
/// its own timer, independent of the per-medication registry.
pub fn start_health_log_reminder_job(ctx: MedimateContext) {
    rt::spawn(async move {
        loop {
            let now = ctx.sys.get_datetime();
            let next = match next_fire_at(
                ctx.config.health_log_reminder_time,
                &[],
                now.date(),
                None,
                now,
            ) {
                Some(next) => next,
                None => break,
            };
            let wait = (next - now).to_std().unwrap_or_default();
            rt::time::sleep(wait).await;

            broadcast_health_log_reminders(&ctx).await;
        }
    });
}

/// One health-log reminder to every user. Failed deliveries are logged and
/// do not stop the rest of the broadcast.
pub async fn broadcast_health_log_reminders(ctx: &MedimateContext) {
    let users = match ctx.repos.users.find_all().await {
        Ok(users) => users,
        Err(e) => {
            error!("Unable to list users for the health log broadcast: {:?}", e);
            return;
        }
    };

    for user in users {
        let message = SmsMessage {
            to: user.phone.clone(),
            body: compose_health_log_sms(&user),
        };
        match ctx.sms.send(message).await {
            Ok(delivery) => info!(
                "Delivered health log reminder to user: {} as message: {}",
                user.id, delivery.message_id
            ),
            Err(e) => error!(
                "Failed to deliver health log reminder to user: {}. Error: {}",
                user.id, e
            ),
        }
    }
}

/// Delivers one due reminder and schedules its next occurrence. The
/// medication is reloaded first so that edits made after scheduling are
/// honored at fire time.
pub async fn fire_reminder(job: ReminderJob, ctx: &MedimateContext) {
    let medication = match ctx.repos.medications.find(&job.id.medication_id).await {
        Some(medication) if medication.reminders && medication.user_id == job.id.user_id => {
            medication
        }
        _ => {
            // The medication was deleted or its reminders were turned off
            // after this job was queued
            ctx.job_registry.remove(&job.id);
            return;
        }
    };

    let now = ctx.sys.get_datetime();
    if medication.is_active_on(now.date()) {
        match ctx.repos.users.find(&job.id.user_id).await {
            Some(user) => {
                let body = compose_reminder_sms(&user, &medication, job.id.time);
                let message = SmsMessage {
                    to: user.phone.clone(),
                    body,
                };
                match ctx.sms.send(message).await {
                    Ok(delivery) => info!(
                        "Delivered reminder: {} as message: {}",
                        job.id, delivery.message_id
                    ),
                    Err(e) => error!("Failed to deliver reminder: {}. Error: {}", job.id, e),
                }
            }
            None => {
                warn!("No user found for reminder: {}", job.id);
                ctx.job_registry.remove(&job.id);
                return;
            }
        }
    }

    match medication.next_fire_at(job.id.time, now) {
        Some(next) => {
            let mut job = job;
            job.next_run_at = next.and_utc().timestamp_millis();
            job.running = true;
            ctx.job_registry.upsert(job);
        }
        None => {
            // The active window has closed, keep the job visible as stopped
            // until the next resync drops it
            let mut job = job;
            job.running = false;
            ctx.job_registry.upsert(job);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use medimate_domain::{JobId, Medication, User};
    use medimate_infra::{ISmsService, ISys, InMemorySmsService, SmsDelivery, SmsError};
    use std::sync::Arc;

    struct StaticTimeSys(i64);

    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            self.0
        }
    }

    struct RejectingSmsService;

    #[async_trait::async_trait]
    impl ISmsService for RejectingSmsService {
        async fn send(&self, _message: SmsMessage) -> Result<SmsDelivery, SmsError> {
            Err(SmsError::Provider("Rejected by the provider".into()))
        }
    }

    fn millis(s: &str) -> i64 {
        s.parse::<NaiveDateTime>()
            .expect("Valid datetime")
            .and_utc()
            .timestamp_millis()
    }

    fn medication_for(user: &User) -> Medication {
        Medication {
            id: Default::default(),
            user_id: user.id.clone(),
            name: "Aspirin".into(),
            dosage: "75mg".into(),
            frequency: None,
            times: vec!["09:00".parse().unwrap()],
            days: Vec::new(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end_date: None,
            reminders: true,
            instructions: None,
            created: 0,
            updated: 0,
        }
    }

    async fn setup(now: &str) -> (MedimateContext, User, Medication, ReminderJob) {
        let mut ctx = MedimateContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys(millis(now)));

        let user = User::new("Tom", "Hardy", "+4799999999");
        ctx.repos.users.insert(&user).await.unwrap();
        let medication = medication_for(&user);
        ctx.repos.medications.insert(&medication).await.unwrap();

        let job = ReminderJob::new(
            JobId::new(
                user.id.clone(),
                medication.id.clone(),
                "09:00".parse().unwrap(),
            ),
            millis(now),
        );
        ctx.job_registry.upsert(job.clone());

        (ctx, user, medication, job)
    }

    #[actix_web::main]
    #[test]
    async fn fires_and_schedules_the_next_occurrence() {
        let (mut ctx, _, _, job) = setup("2025-01-01T09:00:00").await;
        let sms = Arc::new(InMemorySmsService::new());
        ctx.sms = sms.clone();

        fire_reminder(job.clone(), &ctx).await;

        let sent = sms.sent_messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Aspirin"));

        let rescheduled = ctx.job_registry.find(&job.id).expect("Job to remain");
        assert!(rescheduled.running);
        assert_eq!(rescheduled.next_run_at, millis("2025-01-02T09:00:00"));
    }

    #[actix_web::main]
    #[test]
    async fn delivery_failure_still_schedules_the_next_occurrence() {
        let (mut ctx, _, _, job) = setup("2025-01-01T09:00:00").await;
        ctx.sms = Arc::new(RejectingSmsService);

        fire_reminder(job.clone(), &ctx).await;

        let rescheduled = ctx.job_registry.find(&job.id).expect("Job to remain");
        assert!(rescheduled.running);
        assert!(rescheduled.next_run_at > job.next_run_at);
    }

    #[actix_web::main]
    #[test]
    async fn removes_job_when_the_medication_is_gone() {
        let (ctx, _, medication, job) = setup("2025-01-01T09:00:00").await;
        ctx.repos.medications.delete(&medication.id).await.unwrap();

        fire_reminder(job.clone(), &ctx).await;

        assert_eq!(ctx.job_registry.find(&job.id), None);
    }

    #[actix_web::main]
    #[test]
    async fn removes_job_when_reminders_were_disabled() {
        let (ctx, _, mut medication, job) = setup("2025-01-01T09:00:00").await;
        medication.reminders = false;
        ctx.repos.medications.save(&medication).await.unwrap();

        fire_reminder(job.clone(), &ctx).await;

        assert_eq!(ctx.job_registry.find(&job.id), None);
    }

    #[actix_web::main]
    #[test]
    async fn past_end_date_skips_delivery_and_stops_the_job() {
        let (mut ctx, _, mut medication, job) = setup("2025-01-01T09:00:00").await;
        let sms = Arc::new(InMemorySmsService::new());
        ctx.sms = sms.clone();
        medication.end_date = Some(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        ctx.repos.medications.save(&medication).await.unwrap();

        fire_reminder(job.clone(), &ctx).await;

        assert!(sms.sent_messages().is_empty());
        let stopped = ctx.job_registry.find(&job.id).expect("Job to remain");
        assert!(!stopped.running);
    }

    #[actix_web::main]
    #[test]
    async fn health_log_broadcast_reaches_every_user() {
        let mut ctx = MedimateContext::create_inmemory();
        let sms = Arc::new(InMemorySmsService::new());
        ctx.sms = sms.clone();
        ctx.repos
            .users
            .insert(&User::new("Tom", "Hardy", "+4799999999"))
            .await
            .unwrap();
        ctx.repos
            .users
            .insert(&User::new("Jane", "Doe", "+919876543210"))
            .await
            .unwrap();

        broadcast_health_log_reminders(&ctx).await;

        let sent = sms.sent_messages();
        assert_eq!(sent.len(), 2);
        assert!(sent
            .iter()
            .all(|m| m.body.contains("log your health data today")));
    }

    #[actix_web::main]
    #[test]
    async fn health_log_broadcast_continues_past_a_rejecting_provider() {
        let mut ctx = MedimateContext::create_inmemory();
        ctx.sms = Arc::new(RejectingSmsService);
        ctx.repos
            .users
            .insert(&User::new("Tom", "Hardy", "+4799999999"))
            .await
            .unwrap();

        // Only logged, the broadcast itself reports nothing
        broadcast_health_log_reminders(&ctx).await;
    }
}
