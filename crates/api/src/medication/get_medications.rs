use crate::error::MedimateError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use medimate_api_structs::medication::api::get_medications::*;
use medimate_api_structs::MedicationDTO;
use medimate_domain::{Medication, ID};
use medimate_infra::MedimateContext;

pub async fn get_medications_controller(
    http_req: HttpRequest,
    ctx: web::Data<MedimateContext>,
) -> Result<HttpResponse, MedimateError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetMedicationsUseCase { user_id: user.id };

    execute(usecase, &ctx)
        .await
        .map(|medications| {
            HttpResponse::Ok().json(APIResponse {
                medications: medications.iter().map(MedicationDTO::new).collect(),
            })
        })
        .map_err(MedimateError::from)
}

#[derive(Debug)]
pub struct GetMedicationsUseCase {
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for MedimateError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetMedicationsUseCase {
    type Response = Vec<Medication>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetMedications";

    async fn execute(&mut self, ctx: &MedimateContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .medications
            .find_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use medimate_domain::User;

    fn medication_for(user_id: &ID, name: &str) -> Medication {
        Medication {
            id: Default::default(),
            user_id: user_id.clone(),
            name: name.into(),
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

    #[actix_web::main]
    #[test]
    async fn lists_only_the_callers_medications() {
        let ctx = MedimateContext::create_inmemory();
        let user = User::new("Tom", "Hardy", "+4799999999");
        let other = User::new("Jane", "Doe", "+4788888888");
        ctx.repos
            .medications
            .insert(&medication_for(&user.id, "Aspirin"))
            .await
            .unwrap();
        ctx.repos
            .medications
            .insert(&medication_for(&other.id, "Ibuprofen"))
            .await
            .unwrap();

        let mut usecase = GetMedicationsUseCase {
            user_id: user.id.clone(),
        };
        let medications = usecase.execute(&ctx).await.unwrap();

        assert_eq!(medications.len(), 1);
        assert_eq!(medications[0].name, "Aspirin");
    }
}
