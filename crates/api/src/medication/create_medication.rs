use super::subscribers::SyncRemindersOnMedicationChange;
use super::{parse_days, parse_times};
use crate::error::MedimateError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use medimate_api_structs::medication::api::create_medication::*;
use medimate_domain::{Medication, User};
use medimate_infra::MedimateContext;

pub async fn create_medication_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<MedimateContext>,
) -> Result<HttpResponse, MedimateError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateMedicationUseCase {
        user,
        name: body.name,
        dosage: body.dosage.unwrap_or_default(),
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
        .map(|medication| HttpResponse::Created().json(APIResponse::new(&medication)))
        .map_err(MedimateError::from)
}

#[derive(Debug)]
pub struct CreateMedicationUseCase {
    pub user: User,
    pub name: String,
    pub dosage: String,
    pub frequency: Option<String>,
    pub times: Vec<String>,
    pub days: Vec<String>,
    /// Defaults to today.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reminders: bool,
    pub instructions: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidTimes,
    InvalidDateRange,
    StorageError,
}

impl From<UseCaseError> for MedimateError {
    fn from(e: UseCaseError) -> Self {
        match e {
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
impl UseCase for CreateMedicationUseCase {
    type Response = Medication;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateMedication";

    async fn execute(&mut self, ctx: &MedimateContext) -> Result<Self::Response, Self::Error> {
        let times = parse_times(&self.times);
        if times.is_empty() {
            return Err(UseCaseError::InvalidTimes);
        }
        let days = parse_days(&self.days);

        let start_date = self
            .start_date
            .unwrap_or_else(|| ctx.sys.get_datetime().date());
        if let Some(end_date) = self.end_date {
            if end_date < start_date {
                return Err(UseCaseError::InvalidDateRange);
            }
        }

        let medication = Medication {
            id: Default::default(),
            user_id: self.user.id.clone(),
            name: self.name.clone(),
            dosage: self.dosage.clone(),
            frequency: self.frequency.clone(),
            times,
            days,
            start_date,
            end_date: self.end_date,
            reminders: self.reminders,
            instructions: self.instructions.clone(),
            created: ctx.sys.get_timestamp_millis(),
            updated: ctx.sys.get_timestamp_millis(),
        };

        ctx.repos
            .medications
            .insert(&medication)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(medication)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncRemindersOnMedicationChange)]
    }
}
