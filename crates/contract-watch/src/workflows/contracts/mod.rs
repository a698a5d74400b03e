//! Contract renewal tracking: fact extraction, lifecycle scheduling, risk
//! classification, and the service layer that stores results and queues
//! reminders for an external notifier.
//!
//! The pipeline runs leaf-first, `extract` -> `schedule` -> `classify`, and is
//! a pure function of the text plus an explicit evaluation instant.

pub mod alerts;
pub mod domain;
pub mod extraction;
pub mod overrides;
pub mod repository;
pub mod risk;
pub mod router;
pub mod schedule;
pub mod service;

#[cfg(test)]
mod tests;

pub use alerts::{AlertError, AlertPublisher, ReminderAlert};
pub use domain::{
    ContractAnalysis, ContractId, ContractSubmission, FactField, FactValue, Facts, Reminder,
    RiskStatus, Timeline,
};
pub use extraction::{extract, ExtractionRule, FactExtractor};
pub use overrides::{ContractOverrides, ResolvedTerms};
pub use repository::{
    ContractRecord, ContractRepository, ContractStatusView, DeliveredReminder, RepositoryError,
};
pub use risk::classify;
pub use router::contract_router;
pub use schedule::{schedule, REMINDER_OFFSETS_DAYS};
pub use service::{ContractLifecycleService, ContractServiceError, DispatchSummary};

/// Inbound boundary: extract facts from already-extracted plain text and
/// derive the timeline. Empty text is valid and yields all-absent facts.
pub fn analyze(text: &str) -> ContractAnalysis {
    let facts = extract(text);
    let timeline = schedule(&facts);
    ContractAnalysis { facts, timeline }
}

impl ContractAnalysis {
    pub fn status(&self, now: chrono::DateTime<chrono::Utc>) -> RiskStatus {
        classify(now, &self.facts, self.timeline.as_ref())
    }
}
