use crate::shared::entity::{Entity, ID};

/// A person receiving medication reminders. Created and authenticated by the
/// account system, read here to know who to text and at which number.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub first_name: String,
    pub last_name: String,
    /// Phone number in (close to) E.164 form. Normalized again right before
    /// handing it to the SMS provider.
    pub phone: String,
}

impl User {
    pub fn new(first_name: &str, last_name: &str, phone: &str) -> Self {
        Self {
            id: Default::default(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: phone.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Body of the daily health-log nudge, sent to every user regardless of
/// their medications.
pub fn compose_health_log_sms(user: &User) -> String {
    format!(
        "Hi {}, this is your MediMate reminder: Don't forget to log your health data today! Track your progress for better health.",
        user.full_name()
    )
}
