use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ContractAnalysis, ContractId, Reminder, RiskStatus};
use super::overrides::{ContractOverrides, ResolvedTerms};

/// Repository record: the engine output, the user's override layer, and the
/// reminders already handed to the notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub id: ContractId,
    pub name: String,
    pub analysis: ContractAnalysis,
    #[serde(default)]
    pub overrides: ContractOverrides,
    #[serde(default)]
    pub delivered: Vec<DeliveredReminder>,
}

impl ContractRecord {
    pub fn new(id: ContractId, name: String, analysis: ContractAnalysis) -> Self {
        Self {
            id,
            name,
            analysis,
            overrides: ContractOverrides::default(),
            delivered: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.overrides.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_archived(&self) -> bool {
        self.overrides.archived
    }

    pub fn resolved(&self) -> ResolvedTerms {
        ResolvedTerms::resolve(&self.analysis, &self.overrides)
    }

    /// Reminders due on or before `today` that were not delivered yet.
    pub fn due_reminders(&self, today: NaiveDate) -> Vec<Reminder> {
        self.resolved()
            .reminders()
            .into_iter()
            .filter(|reminder| reminder.trigger_date <= today)
            .filter(|reminder| !self.was_delivered(reminder))
            .collect()
    }

    /// Appends deliveries not yet on the record; repeats are ignored.
    pub fn record_deliveries(&mut self, deliveries: &[DeliveredReminder]) {
        for delivery in deliveries {
            let reminder = Reminder {
                days_before_end: delivery.days_before_end,
                trigger_date: delivery.trigger_date,
            };
            if !self.was_delivered(&reminder) {
                self.delivered.push(delivery.clone());
            }
        }
    }

    fn was_delivered(&self, reminder: &Reminder) -> bool {
        self.delivered.iter().any(|delivered| {
            delivered.days_before_end == reminder.days_before_end
                && delivered.trigger_date == reminder.trigger_date
        })
    }

    pub fn status_view(&self, now: DateTime<Utc>) -> ContractStatusView {
        let resolved = self.resolved();
        let facts = &self.analysis.facts;
        let status = resolved.status(now);

        ContractStatusView {
            contract_id: self.id.clone(),
            name: self.display_name().to_string(),
            status,
            status_label: status.label(),
            effective_date: facts.effective_date,
            term_months: facts.term_months,
            notice_days: facts.notice_days,
            auto_renew: resolved.auto_renew,
            end_date: resolved.end_date,
            notice_deadline: resolved.notice_deadline,
            reminders: resolved.reminders(),
            overridden: resolved.overridden,
            archived: self.is_archived(),
        }
    }
}

/// A reminder already passed to the notification collaborator. Keyed by
/// offset and trigger date so a changed end date re-arms the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveredReminder {
    pub days_before_end: u32,
    pub trigger_date: NaiveDate,
    pub sent_on: NaiveDate,
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Writes touch one part of a stored record at a time and must be applied
/// atomically by the implementation, so a reminder sweep and an override
/// edit running concurrently never overwrite each other's changes.
pub trait ContractRepository: Send + Sync {
    fn insert(&self, record: ContractRecord) -> Result<ContractRecord, RepositoryError>;
    /// Replaces the override layer and returns the updated record.
    fn set_overrides(
        &self,
        id: &ContractId,
        overrides: ContractOverrides,
    ) -> Result<ContractRecord, RepositoryError>;
    /// Merges deliveries into the record, see [`ContractRecord::record_deliveries`].
    fn record_deliveries(
        &self,
        id: &ContractId,
        deliveries: &[DeliveredReminder],
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ContractId) -> Result<Option<ContractRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ContractRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read model combining facts, resolved dates, and the current risk tier.
#[derive(Debug, Clone, Serialize)]
pub struct ContractStatusView {
    pub contract_id: ContractId,
    pub name: String,
    pub status: RiskStatus,
    pub status_label: &'static str,
    pub effective_date: Option<NaiveDate>,
    pub term_months: Option<u32>,
    pub notice_days: Option<u32>,
    pub auto_renew: bool,
    pub end_date: Option<NaiveDate>,
    pub notice_deadline: Option<NaiveDate>,
    pub reminders: Vec<Reminder>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overridden: Vec<&'static str>,
    pub archived: bool,
}
