use chrono::NaiveDate;
use contract_watch::workflows::contracts::{
    AlertError, AlertPublisher, ContractId, ContractOverrides, ContractRecord, ContractRepository,
    DeliveredReminder, ReminderAlert, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryContractRepository {
    records: Arc<Mutex<HashMap<ContractId, ContractRecord>>>,
}

impl ContractRepository for InMemoryContractRepository {
    fn insert(&self, record: ContractRecord) -> Result<ContractRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn set_overrides(
        &self,
        id: &ContractId,
        overrides: ContractOverrides,
    ) -> Result<ContractRecord, RepositoryError> {
        let mut guard = self.lock()?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.overrides = overrides;
        Ok(record.clone())
    }

    fn record_deliveries(
        &self,
        id: &ContractId,
        deliveries: &[DeliveredReminder],
    ) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.record_deliveries(deliveries);
        Ok(())
    }

    fn fetch(&self, id: &ContractId) -> Result<Option<ContractRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ContractRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.values().cloned().collect())
    }
}

impl InMemoryContractRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ContractId, ContractRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

/// Outbox standing in for the e-mail collaborator: every alert is logged and
/// retained so the demo and tests can inspect what would have been sent.
#[derive(Default, Clone)]
pub(crate) struct OutboxAlertPublisher {
    events: Arc<Mutex<Vec<ReminderAlert>>>,
}

impl AlertPublisher for OutboxAlertPublisher {
    fn publish(&self, alert: ReminderAlert) -> Result<(), AlertError> {
        info!(
            contract_id = %alert.contract_id.0,
            subject = %alert.subject(),
            line = %alert.summary(),
            "reminder queued for delivery"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| AlertError::Transport("outbox mutex poisoned".to_string()))?;
        guard.push(alert);
        Ok(())
    }
}

impl OutboxAlertPublisher {
    pub(crate) fn events(&self) -> Vec<ReminderAlert> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
