use super::subscribers::SyncRemindersOnMedicationChange;
use crate::error::MedimateError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, Subscriber, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use medimate_api_structs::medication::api::delete_medication::*;
use medimate_domain::{Medication, User, ID};
use medimate_infra::MedimateContext;

pub async fn delete_medication_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<MedimateContext>,
) -> Result<HttpResponse, MedimateError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = DeleteMedicationUseCase {
        user,
        medication_id: path_params.medication_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|medication| HttpResponse::Ok().json(APIResponse::new(&medication)))
        .map_err(MedimateError::from)
}

#[derive(Debug)]
pub struct DeleteMedicationUseCase {
    pub user: User,
    pub medication_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MedicationNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for MedimateError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MedicationNotFound(medication_id) => Self::NotFound(format!(
                "The medication with id: {}, was not found.",
                medication_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteMedicationUseCase {
    type Response = Medication;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteMedication";

    async fn execute(&mut self, ctx: &MedimateContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.medications.find(&self.medication_id).await {
            Some(medication) if medication.user_id == self.user.id => {}
            _ => return Err(UseCaseError::MedicationNotFound(self.medication_id.clone())),
        }

        ctx.repos
            .medications
            .delete(&self.medication_id)
            .await
            .ok_or(UseCaseError::StorageError)
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
            times: vec!["08:00".into()],
            days: Vec::new(),
            start_date: None,
            end_date: None,
            reminders: true,
            instructions: None,
        };
        execute(usecase, ctx).await.expect("To create medication")
    }

    #[actix_web::main]
    #[test]
    async fn deletes_medication_and_its_jobs() {
        let ctx = MedimateContext::create_inmemory();
        let user = User::new("Tom", "Hardy", "+4799999999");
        ctx.repos.users.insert(&user).await.unwrap();
        let medication = seed(&ctx, &user).await;
        assert_eq!(ctx.job_registry.job_count(), 1);

        let usecase = DeleteMedicationUseCase {
            user,
            medication_id: medication.id.clone(),
        };
        execute(usecase, &ctx).await.expect("To delete medication");

        assert!(ctx.repos.medications.find(&medication.id).await.is_none());
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

        let mut usecase = DeleteMedicationUseCase {
            user: caller,
            medication_id: medication.id.clone(),
        };
        let res = usecase.execute(&ctx).await;

        assert_eq!(
            res.unwrap_err(),
            UseCaseError::MedicationNotFound(medication.id.clone())
        );
        assert!(ctx.repos.medications.find(&medication.id).await.is_some());
    }
}
