use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::contracts::alerts::{AlertError, AlertPublisher, ReminderAlert};
use crate::workflows::contracts::domain::{ContractId, ContractSubmission};
use crate::workflows::contracts::overrides::ContractOverrides;
use crate::workflows::contracts::repository::{
    ContractRecord, ContractRepository, DeliveredReminder, RepositoryError,
};
use crate::workflows::contracts::service::ContractLifecycleService;

pub(super) const MASTER_SERVICES_AGREEMENT: &str = "MASTER SERVICES AGREEMENT\n\
The Effective Date of this Agreement is January 1, 2024.\n\
1. Term. The initial term of twelve (12) months shall commence on the Effective Date.\n\
2. Renewal. This Agreement automatically renews for successive one-year periods unless \
either party provides sixty (60) days prior written notice of non-renewal.\n";

pub(super) const TERM_ONLY_AGREEMENT: &str = "This agreement has an initial term of 24 months \
and will auto-renew thereafter.";

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn at_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn submission() -> ContractSubmission {
    ContractSubmission {
        name: "acme-msa.pdf".to_string(),
        text: MASTER_SERVICES_AGREEMENT.to_string(),
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) records: Mutex<HashMap<ContractId, ContractRecord>>,
}

impl ContractRepository for MemoryRepository {
    fn insert(&self, record: ContractRecord) -> Result<ContractRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.overrides = overrides;
        Ok(record.clone())
    }

    fn record_deliveries(
        &self,
        id: &ContractId,
        deliveries: &[DeliveredReminder],
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.record_deliveries(deliveries);
        Ok(())
    }

    fn fetch(&self, id: &ContractId) -> Result<Option<ContractRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ContractRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl ContractRepository for UnavailableRepository {
    fn insert(&self, _record: ContractRecord) -> Result<ContractRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn set_overrides(
        &self,
        _id: &ContractId,
        _overrides: ContractOverrides,
    ) -> Result<ContractRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn record_deliveries(
        &self,
        _id: &ContractId,
        _deliveries: &[DeliveredReminder],
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &ContractId) -> Result<Option<ContractRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ContractRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryAlerts {
    pub(super) events: Mutex<Vec<ReminderAlert>>,
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: ReminderAlert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert);
        Ok(())
    }
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<ReminderAlert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

pub(super) struct FailingAlerts;

impl AlertPublisher for FailingAlerts {
    fn publish(&self, _alert: ReminderAlert) -> Result<(), AlertError> {
        Err(AlertError::Transport("smtp down".to_string()))
    }
}

/// Stores records in memory but refuses to record deliveries for one
/// contract, standing in for a write that fails mid-sweep.
#[derive(Default)]
pub(super) struct LossyDeliveryRepository {
    pub(super) inner: MemoryRepository,
    pub(super) broken: Mutex<Option<ContractId>>,
}

impl ContractRepository for LossyDeliveryRepository {
    fn insert(&self, record: ContractRecord) -> Result<ContractRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn set_overrides(
        &self,
        id: &ContractId,
        overrides: ContractOverrides,
    ) -> Result<ContractRecord, RepositoryError> {
        self.inner.set_overrides(id, overrides)
    }

    fn record_deliveries(
        &self,
        id: &ContractId,
        deliveries: &[DeliveredReminder],
    ) -> Result<(), RepositoryError> {
        let broken = self.broken.lock().expect("broken id mutex poisoned");
        if broken.as_ref() == Some(id) {
            return Err(RepositoryError::Unavailable("write timed out".to_string()));
        }
        self.inner.record_deliveries(id, deliveries)
    }

    fn fetch(&self, id: &ContractId) -> Result<Option<ContractRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<ContractRecord>, RepositoryError> {
        self.inner.list()
    }
}

/// Publisher that applies an override edit to the contract while its alert
/// is being delivered, the way a user saving the dashboard during a
/// background sweep would.
pub(super) struct EditingAlerts {
    pub(super) repository: Arc<MemoryRepository>,
    pub(super) overrides: ContractOverrides,
}

impl AlertPublisher for EditingAlerts {
    fn publish(&self, alert: ReminderAlert) -> Result<(), AlertError> {
        self.repository
            .set_overrides(&alert.contract_id, self.overrides.clone())
            .map_err(|err| AlertError::Transport(err.to_string()))?;
        Ok(())
    }
}

pub(super) type MemoryService = ContractLifecycleService<MemoryRepository, MemoryAlerts>;

pub(super) fn build_service() -> (Arc<MemoryService>, Arc<MemoryRepository>, Arc<MemoryAlerts>) {
    let repository = Arc::new(MemoryRepository::default());
    let alerts = Arc::new(MemoryAlerts::default());
    let service = Arc::new(ContractLifecycleService::new(
        repository.clone(),
        alerts.clone(),
    ));
    (service, repository, alerts)
}

pub(super) async fn response_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
