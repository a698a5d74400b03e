use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::alerts::{AlertPublisher, ReminderAlert, RENEWAL_REMINDER_TEMPLATE};
use super::analyze;
use super::domain::{ContractId, ContractSubmission};
use super::overrides::ContractOverrides;
use super::repository::{
    ContractRecord, ContractRepository, ContractStatusView, DeliveredReminder, RepositoryError,
};

/// Service composing the analysis pipeline, the repository, and the reminder
/// publisher.
pub struct ContractLifecycleService<R, A> {
    repository: Arc<R>,
    alerts: Arc<A>,
}

static CONTRACT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_contract_id() -> ContractId {
    let id = CONTRACT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContractId(format!("ctr-{id:06}"))
}

/// Outcome of one reminder sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub today: NaiveDate,
    pub delivered: usize,
    pub failed: usize,
}

impl<R, A> ContractLifecycleService<R, A>
where
    R: ContractRepository + 'static,
    A: AlertPublisher + 'static,
{
    pub fn new(repository: Arc<R>, alerts: Arc<A>) -> Self {
        Self {
            repository,
            alerts,
        }
    }

    /// Analyze submitted text and store the result under a fresh id.
    pub fn ingest(
        &self,
        submission: ContractSubmission,
    ) -> Result<ContractRecord, ContractServiceError> {
        let analysis = analyze(&submission.text);
        let record = ContractRecord::new(next_contract_id(), submission.name, analysis);

        let stored = self.repository.insert(record)?;
        info!(
            contract_id = %stored.id.0,
            determined = stored.analysis.timeline.is_some(),
            auto_renew = stored.analysis.facts.auto_renew,
            "contract ingested"
        );
        Ok(stored)
    }

    pub fn get(&self, contract_id: &ContractId) -> Result<ContractRecord, ContractServiceError> {
        let record = self
            .repository
            .fetch(contract_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn status_view(
        &self,
        contract_id: &ContractId,
        now: DateTime<Utc>,
    ) -> Result<ContractStatusView, ContractServiceError> {
        Ok(self.get(contract_id)?.status_view(now))
    }

    /// Status views for every non-archived contract, classified at `now`.
    pub fn list(&self, now: DateTime<Utc>) -> Result<Vec<ContractStatusView>, ContractServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by(|left, right| left.id.cmp(&right.id));

        Ok(records
            .iter()
            .filter(|record| !record.is_archived())
            .map(|record| record.status_view(now))
            .collect())
    }

    /// Replace the override layer of a contract. Delivery history is left
    /// untouched.
    pub fn apply_overrides(
        &self,
        contract_id: &ContractId,
        overrides: ContractOverrides,
    ) -> Result<ContractRecord, ContractServiceError> {
        let record = self.repository.set_overrides(contract_id, overrides)?;
        info!(contract_id = %contract_id.0, "contract overrides updated");
        Ok(record)
    }

    /// Publish every undelivered reminder whose trigger date is on or before
    /// `today`. A reminder the publisher rejects stays queued for the next sweep.
    /// Failing to record deliveries for one contract does not stop the sweep.
    pub fn dispatch_due(&self, today: NaiveDate) -> Result<DispatchSummary, ContractServiceError> {
        let mut summary = DispatchSummary {
            today,
            delivered: 0,
            failed: 0,
        };

        for record in self.repository.list()? {
            if record.is_archived() {
                continue;
            }

            let due = record.due_reminders(today);
            if due.is_empty() {
                continue;
            }

            let resolved = record.resolved();
            let Some(end_date) = resolved.end_date else {
                continue;
            };

            let mut deliveries = Vec::with_capacity(due.len());
            for reminder in due {
                let alert = ReminderAlert {
                    template: RENEWAL_REMINDER_TEMPLATE.to_string(),
                    contract_id: record.id.clone(),
                    contract_name: record.display_name().to_string(),
                    end_date,
                    auto_renew: resolved.auto_renew,
                    days_before_end: reminder.days_before_end,
                    trigger_date: reminder.trigger_date,
                };

                match self.alerts.publish(alert) {
                    Ok(()) => {
                        deliveries.push(DeliveredReminder {
                            days_before_end: reminder.days_before_end,
                            trigger_date: reminder.trigger_date,
                            sent_on: today,
                        });
                        summary.delivered += 1;
                    }
                    Err(err) => {
                        warn!(contract_id = %record.id.0, error = %err, "reminder delivery failed");
                        summary.failed += 1;
                    }
                }
            }

            if deliveries.is_empty() {
                continue;
            }
            if let Err(err) = self.repository.record_deliveries(&record.id, &deliveries) {
                warn!(
                    contract_id = %record.id.0,
                    error = %err,
                    sent = deliveries.len(),
                    "delivered reminders could not be recorded"
                );
            }
        }

        info!(
            %today,
            delivered = summary.delivered,
            failed = summary.failed,
            "reminder sweep finished"
        );
        Ok(summary)
    }
}

/// Error raised by the contract service.
#[derive(Debug, thiserror::Error)]
pub enum ContractServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
