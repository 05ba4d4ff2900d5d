use crate::error::MedimateError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Timelike;
use medimate_api_structs::reminder::api::send_reminder::*;
use medimate_domain::{compose_reminder_sms, ClockTime, User, ID};
use medimate_infra::{MedimateContext, SmsDelivery, SmsError, SmsMessage};

pub async fn send_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<MedimateContext>,
) -> Result<HttpResponse, MedimateError> {
    let user = protect_route(&http_req, &ctx).await?;

    let body = body.0;
    let time = match &body.time {
        Some(raw) => Some(
            raw.parse::<ClockTime>()
                .map_err(|e| MedimateError::BadClientData(e.to_string()))?,
        ),
        None => None,
    };
    let usecase = SendReminderUseCase {
        user,
        medication_id: body.medication_id,
        time,
    };

    execute(usecase, &ctx)
        .await
        .map(|delivery| {
            HttpResponse::Ok().json(APIResponse {
                message_id: delivery.message_id,
            })
        })
        .map_err(MedimateError::from)
}

/// Sends one reminder SMS right away, outside of the schedule.
#[derive(Debug)]
pub struct SendReminderUseCase {
    pub user: User,
    pub medication_id: ID,
    /// Clock time to mention in the message. Defaults to the current server
    /// time.
    pub time: Option<ClockTime>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MedicationNotFound(ID),
    InvalidPhoneNumber(String),
    DeliveryFailed(String),
}

impl From<UseCaseError> for MedimateError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::MedicationNotFound(medication_id) => Self::NotFound(format!(
                "The medication with id: {}, was not found.",
                medication_id
            )),
            UseCaseError::InvalidPhoneNumber(phone) => Self::BadClientData(format!(
                "The phone number: {}, cannot receive SMS messages",
                phone
            )),
            UseCaseError::DeliveryFailed(_) => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendReminderUseCase {
    type Response = SmsDelivery;

    type Error = UseCaseError;

    const NAME: &'static str = "SendReminder";

    async fn execute(&mut self, ctx: &MedimateContext) -> Result<Self::Response, Self::Error> {
        let medication = match ctx.repos.medications.find(&self.medication_id).await {
            Some(medication) if medication.user_id == self.user.id => medication,
            _ => return Err(UseCaseError::MedicationNotFound(self.medication_id.clone())),
        };

        let time = self.time.unwrap_or_else(|| {
            let now = ctx.sys.get_datetime().time();
            ClockTime {
                hours: now.hour(),
                minutes: now.minute(),
            }
        });

        let body = compose_reminder_sms(&self.user, &medication, time);
        ctx.sms
            .send(SmsMessage {
                to: self.user.phone.clone(),
                body,
            })
            .await
            .map_err(|e| match e {
                SmsError::InvalidPhoneNumber(phone) => UseCaseError::InvalidPhoneNumber(phone),
                SmsError::Provider(msg) => UseCaseError::DeliveryFailed(msg),
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use medimate_domain::Medication;
    use medimate_infra::{ISmsService, InMemorySmsService};
    use std::sync::Arc;

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

    #[actix_web::main]
    #[test]
    async fn sends_an_immediate_reminder() {
        let mut ctx = MedimateContext::create_inmemory();
        let sms = Arc::new(InMemorySmsService::new());
        ctx.sms = sms.clone();

        let user = User::new("Tom", "Hardy", "+4799999999");
        ctx.repos.users.insert(&user).await.unwrap();
        let medication = medication_for(&user);
        ctx.repos.medications.insert(&medication).await.unwrap();

        let mut usecase = SendReminderUseCase {
            user,
            medication_id: medication.id.clone(),
            time: Some("09:00".parse().unwrap()),
        };
        let res = usecase.execute(&ctx).await;

        assert!(res.is_ok());
        let sent = sms.sent_messages();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Aspirin"));
        assert!(sent[0].body.contains("09:00"));
    }

    #[actix_web::main]
    #[test]
    async fn rejects_medication_owned_by_another_user() {
        let ctx = MedimateContext::create_inmemory();
        let owner = User::new("Tom", "Hardy", "+4799999999");
        let caller = User::new("Jane", "Doe", "+4788888888");
        ctx.repos.users.insert(&owner).await.unwrap();
        ctx.repos.users.insert(&caller).await.unwrap();
        let medication = medication_for(&owner);
        ctx.repos.medications.insert(&medication).await.unwrap();

        let mut usecase = SendReminderUseCase {
            user: caller,
            medication_id: medication.id.clone(),
            time: None,
        };
        let res = usecase.execute(&ctx).await;

        assert_eq!(
            res.unwrap_err(),
            UseCaseError::MedicationNotFound(medication.id)
        );
    }

    #[actix_web::main]
    #[test]
    async fn surfaces_invalid_phone_number() {
        let ctx = MedimateContext::create_inmemory();
        let user = User::new("Tom", "Hardy", "123");
        ctx.repos.users.insert(&user).await.unwrap();
        let medication = medication_for(&user);
        ctx.repos.medications.insert(&medication).await.unwrap();

        let mut usecase = SendReminderUseCase {
            user,
            medication_id: medication.id.clone(),
            time: None,
        };
        let res = usecase.execute(&ctx).await;

        assert!(matches!(
            res.unwrap_err(),
            UseCaseError::InvalidPhoneNumber(_)
        ));
    }
}
