use super::domain::{ContractAnalysis, Reminder, RiskStatus};
use super::risk::classify_terms;
use super::schedule::{notice_deadline, reminders_before};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Manual corrections entered by a user. Stored beside the analysis and
/// applied at read time; the computed timeline is never edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractOverrides {
    pub display_name: Option<String>,
    pub end_date: Option<NaiveDate>,
    pub notice_deadline: Option<NaiveDate>,
    pub auto_renew: Option<bool>,
    pub archived: bool,
}

impl ContractOverrides {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Effective contract terms after layering overrides on the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTerms {
    pub end_date: Option<NaiveDate>,
    pub notice_deadline: Option<NaiveDate>,
    pub auto_renew: bool,
    pub overridden: Vec<&'static str>,
}

impl ResolvedTerms {
    pub fn resolve(analysis: &ContractAnalysis, overrides: &ContractOverrides) -> Self {
        let timeline = analysis.timeline.as_ref();
        let mut overridden = Vec::new();

        let end_date = match overrides.end_date {
            Some(date) => {
                overridden.push("end_date");
                Some(date)
            }
            None => timeline.map(|timeline| timeline.end_date),
        };

        let notice_deadline = match overrides.notice_deadline {
            Some(date) => {
                overridden.push("notice_deadline");
                Some(date)
            }
            // A moved end date moves the deadline with it.
            None if overrides.end_date.is_some() => {
                end_date.and_then(|end| notice_deadline(end, analysis.facts.notice_days))
            }
            None => timeline.and_then(|timeline| timeline.notice_deadline),
        };

        let auto_renew = match overrides.auto_renew {
            Some(flag) => {
                overridden.push("auto_renew");
                flag
            }
            None => analysis.facts.auto_renew,
        };

        Self {
            end_date,
            notice_deadline,
            auto_renew,
            overridden,
        }
    }

    pub fn status(&self, now: DateTime<Utc>) -> RiskStatus {
        classify_terms(now, self.notice_deadline, self.auto_renew)
    }

    /// Reminder schedule against the effective end date.
    pub fn reminders(&self) -> Vec<Reminder> {
        self.end_date
            .and_then(reminders_before)
            .map(Vec::from)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::contracts::analyze;
    use chrono::TimeZone;

    const SAMPLE: &str = "The Effective Date of this Agreement is January 1, 2024. \
The initial term of twelve (12) months automatically renews unless either party \
gives sixty (60) days prior written notice.";

    #[test]
    fn no_overrides_mirror_the_timeline() {
        let analysis = analyze(SAMPLE);
        let resolved = ResolvedTerms::resolve(&analysis, &ContractOverrides::default());
        let timeline = analysis.timeline.as_ref().expect("timeline");

        assert_eq!(resolved.end_date, Some(timeline.end_date));
        assert_eq!(resolved.notice_deadline, timeline.notice_deadline);
        assert!(resolved.auto_renew);
        assert!(resolved.overridden.is_empty());
        assert_eq!(resolved.reminders(), timeline.reminders.to_vec());
    }

    #[test]
    fn overrides_shift_reminders_without_touching_analysis() {
        let analysis = analyze(SAMPLE);
        let before = analysis.clone();
        let overrides = ContractOverrides {
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            auto_renew: Some(false),
            ..ContractOverrides::default()
        };

        let resolved = ResolvedTerms::resolve(&analysis, &overrides);

        assert_eq!(analysis, before);
        assert_eq!(resolved.overridden, vec!["end_date", "auto_renew"]);
        assert_eq!(
            resolved.reminders()[2].trigger_date,
            NaiveDate::from_ymd_opt(2025, 5, 31).expect("date")
        );
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single().expect("instant");
        assert_eq!(resolved.status(now), RiskStatus::Safe);
    }

    #[test]
    fn end_date_override_carries_the_notice_period() {
        let analysis = analyze(SAMPLE);
        let overrides = ContractOverrides {
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            ..ContractOverrides::default()
        };

        let resolved = ResolvedTerms::resolve(&analysis, &overrides);

        assert_eq!(
            resolved.notice_deadline,
            NaiveDate::from_ymd_opt(2025, 5, 1)
        );
        assert_eq!(resolved.overridden, vec!["end_date"]);
        // the computed deadline (2024-11-02) would have been long past
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).single().expect("instant");
        assert_eq!(resolved.status(now), RiskStatus::AutoRenewalRisk);
        let now = Utc.with_ymd_and_hms(2025, 4, 15, 0, 0, 0).single().expect("instant");
        assert_eq!(resolved.status(now), RiskStatus::ActionNeeded);
    }

    #[test]
    fn explicit_deadline_override_wins_over_derived_one() {
        let analysis = analyze(SAMPLE);
        let overrides = ContractOverrides {
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            notice_deadline: NaiveDate::from_ymd_opt(2025, 3, 1),
            ..ContractOverrides::default()
        };

        let resolved = ResolvedTerms::resolve(&analysis, &overrides);
        assert_eq!(
            resolved.notice_deadline,
            NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }

    #[test]
    fn end_date_override_gives_undetermined_contract_reminders() {
        let analysis = analyze("initial term of 24 months");
        assert!(analysis.timeline.is_none());

        let overrides = ContractOverrides {
            end_date: NaiveDate::from_ymd_opt(2026, 1, 15),
            ..ContractOverrides::default()
        };
        let resolved = ResolvedTerms::resolve(&analysis, &overrides);
        assert_eq!(resolved.reminders().len(), 3);
        assert_eq!(resolved.notice_deadline, None);
    }
}
