use crate::error::MedimateError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use medimate_api_structs::reminder::api::get_scheduled_jobs::*;
use medimate_api_structs::ReminderJobDTO;
use medimate_domain::{ReminderJob, ID};
use medimate_infra::MedimateContext;

pub async fn get_scheduled_jobs_controller(
    http_req: HttpRequest,
    ctx: web::Data<MedimateContext>,
) -> Result<HttpResponse, MedimateError> {
    let user = protect_route(&http_req, &ctx).await?;

    let usecase = GetScheduledJobsUseCase { user_id: user.id };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse {
                jobs: res.jobs.iter().map(ReminderJobDTO::new).collect(),
                sms_available: res.sms_available,
            })
        })
        .map_err(|_| MedimateError::InternalError)
}

#[derive(Debug)]
pub struct GetScheduledJobsUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub jobs: Vec<ReminderJob>,
    pub sms_available: bool,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetScheduledJobsUseCase {
    type Response = UseCaseResponse;

    type Error = ();

    const NAME: &'static str = "GetScheduledJobs";

    async fn execute(&mut self, ctx: &MedimateContext) -> Result<Self::Response, Self::Error> {
        let mut jobs = ctx
            .job_registry
            .list_by(|job| job.id.user_id == self.user_id);
        jobs.sort_by_key(|job| job.next_run_at);

        Ok(UseCaseResponse {
            jobs,
            sms_available: ctx.sms.is_available(),
        })
    }
}
