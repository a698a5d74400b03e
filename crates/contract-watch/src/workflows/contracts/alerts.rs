use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::ContractId;

pub const RENEWAL_REMINDER_TEMPLATE: &str = "contract_renewal_reminder";

/// Trait describing outbound reminder hooks (e-mail, chat, calendar adapters).
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: ReminderAlert) -> Result<(), AlertError>;
}

/// Payload handed to the notification collaborator for one due reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderAlert {
    pub template: String,
    pub contract_id: ContractId,
    pub contract_name: String,
    pub end_date: NaiveDate,
    pub auto_renew: bool,
    pub days_before_end: u32,
    pub trigger_date: NaiveDate,
}

impl ReminderAlert {
    pub fn subject(&self) -> String {
        format!("Contract Alert: {}", self.contract_name)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} days before renewal -> {}",
            self.days_before_end, self.trigger_date
        )
    }
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}
