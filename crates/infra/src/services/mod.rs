mod sms;

pub use sms::{
    normalize_phone_number, ISmsService, InMemorySmsService, SmsDelivery, SmsError, SmsMessage,
    TwilioSmsService,
};
