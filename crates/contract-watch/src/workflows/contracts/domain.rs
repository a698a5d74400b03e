use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier assigned to a contract when it is ingested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(pub String);

/// Facts pulled out of a contract body. Unmatched fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facts {
    pub effective_date: Option<NaiveDate>,
    pub term_months: Option<u32>,
    pub auto_renew: bool,
    pub notice_days: Option<u32>,
}

impl Facts {
    pub fn has(&self, field: FactField) -> bool {
        match field {
            FactField::EffectiveDate => self.effective_date.is_some(),
            FactField::TermMonths => self.term_months.is_some(),
            FactField::AutoRenew => self.auto_renew,
            FactField::NoticeDays => self.notice_days.is_some(),
        }
    }

    /// Fills the slot addressed by `value` unless an earlier rule already did.
    pub(crate) fn record(&mut self, value: FactValue) {
        match value {
            FactValue::EffectiveDate(date) => {
                self.effective_date.get_or_insert(date);
            }
            FactValue::TermMonths(months) => {
                self.term_months.get_or_insert(months);
            }
            FactValue::AutoRenew => self.auto_renew = true,
            FactValue::NoticeDays(days) => {
                self.notice_days.get_or_insert(days);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactField {
    EffectiveDate,
    TermMonths,
    AutoRenew,
    NoticeDays,
}

impl FactField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EffectiveDate => "Effective date",
            Self::TermMonths => "Initial term",
            Self::AutoRenew => "Auto-renewal",
            Self::NoticeDays => "Notice period",
        }
    }
}

/// Normalized value produced by a single extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactValue {
    EffectiveDate(NaiveDate),
    TermMonths(u32),
    AutoRenew,
    NoticeDays(u32),
}

impl FactValue {
    pub const fn field(&self) -> FactField {
        match self {
            Self::EffectiveDate(_) => FactField::EffectiveDate,
            Self::TermMonths(_) => FactField::TermMonths,
            Self::AutoRenew => FactField::AutoRenew,
            Self::NoticeDays(_) => FactField::NoticeDays,
        }
    }
}

/// Lead-time trigger ahead of the contract end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub days_before_end: u32,
    pub trigger_date: NaiveDate,
}

/// Lifecycle dates derived from [`Facts`]. Rebuilt from scratch on every
/// analysis and never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notice_deadline: Option<NaiveDate>,
    pub reminders: [Reminder; 3],
}

/// Coarse urgency tier for a contract at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    ActionNeeded,
    AutoRenewalRisk,
    Safe,
}

impl RiskStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ActionNeeded => "Action needed",
            Self::AutoRenewalRisk => "Auto-renewal risk",
            Self::Safe => "Safe",
        }
    }
}

/// Output of the extraction and scheduling pipeline for one document.
/// `timeline` is `None` when the contract dates are undetermined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAnalysis {
    pub facts: Facts,
    pub timeline: Option<Timeline>,
}

/// Already-extracted plain text for one document plus a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSubmission {
    pub name: String,
    pub text: String,
}
