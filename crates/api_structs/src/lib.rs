pub mod medication;
pub mod reminder;
pub mod status;

pub use medication::dtos::MedicationDTO;
pub use reminder::dtos::ReminderJobDTO;
