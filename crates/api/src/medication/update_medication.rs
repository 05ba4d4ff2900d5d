use super::subscribers::SyncRemindersOnMedicationChange;
use super::{parse_days, parse_times};
use crate::error::MedimateError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use medimate_api_structs::medication::api::update_medication::*;
use medimate_domain::{Medication, User, ID};
use medimate_infra::MedimateContext;

pub async fn update_medication_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<MedimateContext>,
) -> Result<HttpResponse, MedimateError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = UpdateMedicationUseCase {
        user,
        medication_id: path_params.medication_id.clone(),
        name: body.name,
        dosage: body.dosage,
        frequency: body.frequency,
        times: body.times,
        days: body.days,
        start_date: body.start_date,
        end_date: body.end_date,
        reminders: body.reminders,
        instructions: body.instructions,
    };

    execute(usecase, &ctx)
        .await
        .map(|medication| HttpResponse::Ok().json(APIResponse::new(&medication)))
        .map_err(MedimateError::from)
}

/// Applies the provided fields, fields left as `None` are unchanged.
#[derive(Debug)]
pub struct UpdateMedicationUseCase {
    pub user: User,
    pub medication_id: ID,
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub times: Option<Vec<String>>,
    pub days: Option<Vec<String>>,
    pub start_date: Option<NaiveDate>,
    /// `Some(None)` clears the end date, `None` leaves it unchanged.
    pub end_date: Option<Option<NaiveDate>>,
    pub reminders: Option<bool>,
    pub instructions: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MedicationNotFound(ID),
    InvalidTimes,
    InvalidDateRange,
    StorageError,
}

impl From<UseCaseError> for MedimateError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MedicationNotFound(medication_id) => Self::NotFound(format!(
                "The medication with id: {}, was not found.",
                medication_id
            )),
            UseCaseError::InvalidTimes => {
                Self::BadClientData("No valid reminder times were provided".into())
            }
            UseCaseError::InvalidDateRange => {
                Self::BadClientData("The end date cannot be before the start date".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateMedicationUseCase {
    type Response = Medication;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateMedication";

    async fn execute(&mut self, ctx: &MedimateContext) -> Result<Self::Response, Self::Error> {
        let mut medication = match ctx.repos.medications.find(&self.medication_id).await {
            Some(medication) if medication.user_id == self.user.id => medication,
            _ => return Err(UseCaseError::MedicationNotFound(self.medication_id.clone())),
        };

        if let Some(name) = &self.name {
            medication.name = name.clone();
        }
        if let Some(dosage) = &self.dosage {
            medication.dosage = dosage.clone();
        }
        if let Some(frequency) = &self.frequency {
            medication.frequency = Some(frequency.clone());
        }
        if let Some(raw_times) = &self.times {
            let times = parse_times(raw_times);
            if times.is_empty() {
                return Err(UseCaseError::InvalidTimes);
            }
            medication.times = times;
        }
        if let Some(raw_days) = &self.days {
            medication.days = parse_days(raw_days);
        }
        if let Some(start_date) = self.start_date {
            medication.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            medication.end_date = end_date;
        }
        if let Some(end_date) = medication.end_date {
            if end_date < medication.start_date {
                return Err(UseCaseError::InvalidDateRange);
            }
        }
        if let Some(reminders) = self.reminders {
            medication.reminders = reminders;
        }
        if let Some(instructions) = &self.instructions {
            medication.instructions = Some(instructions.clone());
        }
        medication.updated = ctx.sys.get_timestamp_millis();

        ctx.repos
            .medications
            .save(&medication)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(medication)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnMedicationChange)]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::medication::create_medication::CreateMedicationUseCase;

    async fn seed(ctx: &MedimateContext, user: &User) -> Medication {
        let usecase = CreateMedicationUseCase {
            user: user.clone(),
            name: "Aspirin".into(),
            dosage: "75mg".into(),
            frequency: None,
            times: vec!["08:00".into(), "20:00".into()],
            days: Vec::new(),
            start_date: None,
            end_date: None,
            reminders: true,
            instructions: None,
        };
        execute(usecase, ctx).await.expect("To create medication")
    }

    fn usecase_factory(user: User, medication_id: ID) -> UpdateMedicationUseCase {
        UpdateMedicationUseCase {
            user,
            medication_id,
            name: None,
            dosage: None,
            frequency: None,
            times: None,
            days: None,
            start_date: None,
            end_date: None,
            reminders: None,
            instructions: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn updates_times_and_reschedules_jobs() {
        let ctx = MedimateContext::create_inmemory();
        let user = User::new("Tom", "Hardy", "+4799999999");
        ctx.repos.users.insert(&user).await.unwrap();
        let medication = seed(&ctx, &user).await;
        assert_eq!(ctx.job_registry.job_count(), 2);

        let mut usecase = usecase_factory(user, medication.id.clone());
        usecase.times = Some(vec!["12:00".into()]);
        let updated = execute(usecase, &ctx).await.expect("To update medication");

        assert_eq!(updated.times, vec!["12:00".parse().unwrap()]);
        let jobs = ctx
            .job_registry
            .list_by(|job| job.id.medication_id == medication.id);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id.time, "12:00".parse().unwrap());
    }

    #[actix_web::main]
    #[test]
    async fn disabling_reminders_removes_jobs() {
        let ctx = MedimateContext::create_inmemory();
        let user = User::new("Tom", "Hardy", "+4799999999");
        ctx.repos.users.insert(&user).await.unwrap();
        let medication = seed(&ctx, &user).await;

        let mut usecase = usecase_factory(user, medication.id.clone());
        usecase.reminders = Some(false);
        execute(usecase, &ctx).await.expect("To update medication");

        assert_eq!(ctx.job_registry.job_count(), 0);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_medication_owned_by_another_user() {
        let ctx = MedimateContext::create_inmemory();
        let owner = User::new("Tom", "Hardy", "+4799999999");
        let caller = User::new("Jane", "Doe", "+4788888888");
        ctx.repos.users.insert(&owner).await.unwrap();
        ctx.repos.users.insert(&caller).await.unwrap();
        let medication = seed(&ctx, &owner).await;

        let mut usecase = usecase_factory(caller, medication.id.clone());
        usecase.name = Some("Ibuprofen".into());
        let res = usecase.execute(&ctx).await;

        assert_eq!(
            res.unwrap_err(),
            UseCaseError::MedicationNotFound(medication.id)
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_update_with_only_invalid_times() {
        let ctx = MedimateContext::create_inmemory();
        let user = User::new("Tom", "Hardy", "+4799999999");
        ctx.repos.users.insert(&user).await.unwrap();
        let medication = seed(&ctx, &user).await;

        let mut usecase = usecase_factory(user, medication.id.clone());
        usecase.times = Some(vec!["99:99".into()]);
        let res = usecase.execute(&ctx).await;

        assert_eq!(res.unwrap_err(), UseCaseError::InvalidTimes);
    }

    #[actix_web::main]
    #[test]
    async fn null_end_date_clears_the_end_date() {
        let ctx = MedimateContext::create_inmemory();
        let user = User::new("Tom", "Hardy", "+4799999999");
        ctx.repos.users.insert(&user).await.unwrap();
        let medication = seed(&ctx, &user).await;

        let mut usecase = usecase_factory(user.clone(), medication.id.clone());
        usecase.end_date = Some(NaiveDate::from_ymd_opt(2999, 1, 1));
        let updated = execute(usecase, &ctx).await.expect("To update medication");
        assert!(updated.end_date.is_some());

        let mut usecase = usecase_factory(user, medication.id.clone());
        usecase.end_date = Some(None);
        let updated = execute(usecase, &ctx).await.expect("To update medication");

        assert_eq!(updated.end_date, None);
        let stored = ctx
            .repos
            .medications
            .find(&medication.id)
            .await
            .expect("To find medication");
        assert_eq!(stored.end_date, None);
        // The rebuilt jobs are back on the open-ended schedule
        assert_eq!(ctx.job_registry.job_count(), 2);
    }
}
