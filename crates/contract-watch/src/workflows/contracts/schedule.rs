use super::domain::{Facts, Reminder, Timeline};
use chrono::{Days, Months, NaiveDate};
use tracing::debug;

/// Lead times, in days before the end date, at which reminders fire.
pub const REMINDER_OFFSETS_DAYS: [u32; 3] = [90, 60, 30];

/// Derives the contract timeline, or `None` when the effective date or term
/// is missing. Date arithmetic that leaves the supported calendar range is
/// treated the same way.
pub fn schedule(facts: &Facts) -> Option<Timeline> {
    let (start_date, term_months) = match (facts.effective_date, facts.term_months) {
        (Some(start), Some(term)) => (start, term),
        (start, term) => {
            debug!(
                has_effective_date = start.is_some(),
                has_term = term.is_some(),
                "timeline undetermined"
            );
            return None;
        }
    };

    let end_date = add_months(start_date, term_months)?;
    let notice_deadline = notice_deadline(end_date, facts.notice_days);
    let reminders = reminders_before(end_date)?;

    Some(Timeline {
        start_date,
        end_date,
        notice_deadline,
        reminders,
    })
}

/// Calendar-month addition; the day is clamped to the end of the target month
/// (`2024-01-31 + 1` is `2024-02-29`).
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Last day notice can be given: `end_date` minus the notice period.
pub fn notice_deadline(end_date: NaiveDate, notice_days: Option<u32>) -> Option<NaiveDate> {
    notice_days.and_then(|days| end_date.checked_sub_days(Days::new(u64::from(days))))
}

/// Reminders for [`REMINDER_OFFSETS_DAYS`], largest offset first.
pub fn reminders_before(end_date: NaiveDate) -> Option<[Reminder; 3]> {
    let [first, second, third] = REMINDER_OFFSETS_DAYS;
    Some([
        reminder(end_date, first)?,
        reminder(end_date, second)?,
        reminder(end_date, third)?,
    ])
}

fn reminder(end_date: NaiveDate, days_before_end: u32) -> Option<Reminder> {
    end_date
        .checked_sub_days(Days::new(u64::from(days_before_end)))
        .map(|trigger_date| Reminder {
            days_before_end,
            trigger_date,
        })
}
