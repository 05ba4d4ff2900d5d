use crate::config::TwilioConfig;
use serde::Deserialize;
use std::sync::Mutex;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct SmsMessage {
    pub to: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmsDelivery {
    /// Provider assigned id for the accepted message.
    pub message_id: String,
}

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),
    #[error("SMS provider error: {0}")]
    Provider(String),
}

#[async_trait::async_trait]
pub trait ISmsService: Send + Sync {
    async fn send(&self, message: SmsMessage) -> Result<SmsDelivery, SmsError>;

    /// Whether messages actually reach a phone, as opposed to the dev mode
    /// stub that only logs them.
    fn is_available(&self) -> bool {
        true
    }
}

/// Strips formatting characters and returns the number in E.164 form.
pub fn normalize_phone_number(raw: &str) -> Result<String, SmsError> {
    let digits = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>();
    if digits.len() < 7 || digits.len() > 15 {
        return Err(SmsError::InvalidPhoneNumber(raw.to_string()));
    }
    Ok(format!("+{}", digits))
}

pub struct TwilioSmsService {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    pub fn new(config: TwilioConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TwilioMessageResponse {
    sid: String,
}

#[derive(Debug, Default, Deserialize)]
struct TwilioErrorResponse {
    #[serde(default)]
    message: String,
}

#[async_trait::async_trait]
impl ISmsService for TwilioSmsService {
    async fn send(&self, message: SmsMessage) -> Result<SmsDelivery, SmsError> {
        let to = normalize_phone_number(&message.to)?;
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.config.account_sid
        );

        let res = self
            .client
            .post(&url)
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to.as_str()),
                ("From", self.config.phone_number.as_str()),
                ("Body", message.body.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SmsError::Provider(e.to_string()))?;

        let status = res.status();
        if status.is_success() {
            let body: TwilioMessageResponse = res
                .json()
                .await
                .map_err(|e| SmsError::Provider(e.to_string()))?;
            Ok(SmsDelivery {
                message_id: body.sid,
            })
        } else {
            let body: TwilioErrorResponse = res.json().await.unwrap_or_default();
            Err(SmsError::Provider(format!(
                "Twilio responded with status {}: {}",
                status, body.message
            )))
        }
    }
}

/// Dev mode delivery. Accepts every valid message, logs it and keeps it in
/// memory for inspection by tests.
pub struct InMemorySmsService {
    sent: Mutex<Vec<SmsMessage>>,
}

impl InMemorySmsService {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_messages(&self) -> Vec<SmsMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemorySmsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ISmsService for InMemorySmsService {
    async fn send(&self, message: SmsMessage) -> Result<SmsDelivery, SmsError> {
        let to = normalize_phone_number(&message.to)?;
        info!("SMS delivery is not configured, logging to {}: {}", to, message.body);

        let mut sent = self.sent.lock().unwrap();
        sent.push(SmsMessage {
            to,
            body: message.body,
        });
        Ok(SmsDelivery {
            message_id: format!("dev-{}", sent.len()),
        })
    }

    fn is_available(&self) -> bool {
        false
    }
}
