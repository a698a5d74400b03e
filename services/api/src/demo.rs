use crate::infra::{InMemoryContractRepository, OutboxAlertPublisher};
use chrono::{NaiveDate, Utc};
use clap::Args;
use contract_watch::error::AppError;
use contract_watch::workflows::contracts::{
    analyze, ContractAnalysis, ContractLifecycleService, ContractStatusView, ContractSubmission,
    RiskStatus,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_AGREEMENT: &str = r#"MASTER SERVICES AGREEMENT

This Master Services Agreement is entered into as of January 1, 2024 between
Acme Corp and Globex LLC.

Initial Term. The initial term of this Agreement shall be twelve (12) months.

Renewal. This Agreement shall automatically renew for successive one year terms
unless either party provides at least sixty (60) days prior written notice.
"#;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Plain-text contract file to analyze.
    pub(crate) path: PathBuf,
    /// Evaluate the risk tier as of this date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) now: Option<NaiveDate>,
    /// Emit JSON instead of the text summary.
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the reminder sweep runs for (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct AnalyzeOutput<'a> {
    source: String,
    status: RiskStatus,
    #[serde(flatten)]
    analysis: &'a ContractAnalysis,
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs { path, now, json } = args;

    let text = std::fs::read_to_string(&path)?;
    let analysis = analyze(&text);
    let now = match now {
        Some(date) => date.and_time(chrono::NaiveTime::MIN).and_utc(),
        None => Utc::now(),
    };
    let status = analysis.status(now);

    if json {
        let output = AnalyzeOutput {
            source: path.display().to_string(),
            status,
            analysis: &analysis,
        };
        println!("{}", render_json(&output));
        return Ok(());
    }

    println!("Contract: {}", path.display());
    render_analysis(&analysis, status);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Utc::now().date_naive());
    let now = today.and_time(chrono::NaiveTime::MIN).and_utc();

    let alerts = Arc::new(OutboxAlertPublisher::default());
    let service = ContractLifecycleService::new(
        Arc::new(InMemoryContractRepository::default()),
        alerts.clone(),
    );

    let record = service.ingest(ContractSubmission {
        name: "Master Services Agreement".to_string(),
        text: SAMPLE_AGREEMENT.to_string(),
    })?;

    println!("== Contract Watch demo ({today}) ==");
    render_view(&record.status_view(now));

    let summary = service.dispatch_due(today)?;
    println!();
    println!(
        "Reminder sweep: {} delivered, {} failed",
        summary.delivered, summary.failed
    );
    for alert in alerts.events() {
        println!("  [{}] {}", alert.subject(), alert.summary());
    }

    Ok(())
}

fn render_analysis(analysis: &ContractAnalysis, status: RiskStatus) {
    let facts = &analysis.facts;
    println!("Status: {}", status.label());
    println!("  effective date: {}", display_or_dash(facts.effective_date));
    println!("  term (months):  {}", display_or_dash(facts.term_months));
    println!("  auto-renew:     {}", yes_no(facts.auto_renew));
    println!("  notice (days):  {}", display_or_dash(facts.notice_days));

    match &analysis.timeline {
        Some(timeline) => {
            println!("  end date:       {}", timeline.end_date);
            println!(
                "  notice by:      {}",
                display_or_dash(timeline.notice_deadline)
            );
            for reminder in &timeline.reminders {
                println!(
                    "  reminder:       {} ({} days before end)",
                    reminder.trigger_date, reminder.days_before_end
                );
            }
        }
        None => println!("  timeline:       undetermined"),
    }
}

fn render_view(view: &ContractStatusView) {
    println!("{} [{}]", view.name, view.contract_id.0);
    println!("Status: {}", view.status.label());
    println!("  end date:  {}", display_or_dash(view.end_date));
    println!("  notice by: {}", display_or_dash(view.notice_deadline));
    for reminder in &view.reminders {
        println!(
            "  reminder:  {} ({} days before end)",
            reminder.trigger_date, reminder.days_before_end
        );
    }
}

fn render_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

fn display_or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_agreement_is_fully_determined() {
        let analysis = analyze(SAMPLE_AGREEMENT);
        let timeline = analysis.timeline.expect("sample has a timeline");
        assert_eq!(
            timeline.end_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).expect("date")
        );
        assert_eq!(
            timeline.notice_deadline,
            NaiveDate::from_ymd_opt(2024, 11, 2)
        );
    }

    #[test]
    fn demo_runs_after_the_end_date() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).expect("date");
        run_demo(DemoArgs { today: Some(today) }).expect("demo runs");
    }

    #[test]
    fn analyze_reports_missing_file() {
        let args = AnalyzeArgs {
            path: PathBuf::from("/nonexistent/contract-watch/agreement.txt"),
            now: None,
            json: false,
        };
        match run_analyze(args) {
            Err(AppError::Io(_)) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn json_output_flattens_the_analysis() {
        let analysis = analyze(SAMPLE_AGREEMENT);
        let output = AnalyzeOutput {
            source: "sample.txt".to_string(),
            status: RiskStatus::Safe,
            analysis: &analysis,
        };
        let value: serde_json::Value =
            serde_json::from_str(&render_json(&output)).expect("valid json");
        assert_eq!(value["status"], "safe");
        assert_eq!(value["facts"]["notice_days"], 60);
        assert_eq!(value["timeline"]["end_date"], "2025-01-01");
    }
}
