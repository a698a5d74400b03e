use super::domain::{Facts, RiskStatus, Timeline};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

/// A notice deadline this close to `now` (or already past) needs action.
pub const ACTION_WINDOW_DAYS: i64 = 30;

/// Classifies a contract at the single instant `now`.
///
/// Precedence, first match wins:
/// 1. notice deadline within [`ACTION_WINDOW_DAYS`] of `now`, past deadlines included
/// 2. auto-renewal clause present
/// 3. otherwise safe
///
/// A missing timeline or notice deadline skips the first rule.
pub fn classify(now: DateTime<Utc>, facts: &Facts, timeline: Option<&Timeline>) -> RiskStatus {
    let notice_deadline = timeline.and_then(|timeline| timeline.notice_deadline);
    classify_terms(now, notice_deadline, facts.auto_renew)
}

pub(crate) fn classify_terms(
    now: DateTime<Utc>,
    notice_deadline: Option<NaiveDate>,
    auto_renew: bool,
) -> RiskStatus {
    if notice_deadline.is_some_and(|deadline| deadline_within_window(now, deadline)) {
        return RiskStatus::ActionNeeded;
    }

    if auto_renew {
        return RiskStatus::AutoRenewalRisk;
    }

    RiskStatus::Safe
}

// Deadlines are dates; they are compared from midnight UTC.
fn deadline_within_window(now: DateTime<Utc>, deadline: NaiveDate) -> bool {
    let deadline_start = deadline.and_time(NaiveTime::MIN).and_utc();
    deadline_start.signed_duration_since(now) <= Duration::days(ACTION_WINDOW_DAYS)
}
