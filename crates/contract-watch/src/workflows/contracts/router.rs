use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::alerts::AlertPublisher;
use super::analyze;
use super::domain::{ContractId, ContractSubmission, Facts, RiskStatus, Timeline};
use super::overrides::ContractOverrides;
use super::repository::{ContractRepository, RepositoryError};
use super::risk::classify;
use super::service::{ContractLifecycleService, ContractServiceError};

/// Router builder exposing analysis, contract, and reminder endpoints.
pub fn contract_router<R, A>(service: Arc<ContractLifecycleService<R, A>>) -> Router
where
    R: ContractRepository + 'static,
    A: AlertPublisher + 'static,
{
    Router::new()
        .route("/api/v1/contracts/analyze", post(analyze_handler))
        .route(
            "/api/v1/contracts",
            post(submit_handler::<R, A>).get(list_handler::<R, A>),
        )
        .route(
            "/api/v1/contracts/:contract_id",
            get(status_handler::<R, A>),
        )
        .route(
            "/api/v1/contracts/:contract_id/overrides",
            put(overrides_handler::<R, A>),
        )
        .route(
            "/api/v1/reminders/dispatch",
            post(dispatch_handler::<R, A>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub facts: Facts,
    pub timeline: Option<Timeline>,
    pub status: RiskStatus,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DispatchRequest {
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

pub(crate) async fn analyze_handler(Json(request): Json<AnalyzeRequest>) -> Json<AnalyzeResponse> {
    let now = request.now.unwrap_or_else(Utc::now);
    let analysis = analyze(&request.text);
    let status = classify(now, &analysis.facts, analysis.timeline.as_ref());

    Json(AnalyzeResponse {
        facts: analysis.facts,
        timeline: analysis.timeline,
        status,
        evaluated_at: now,
    })
}

pub(crate) async fn submit_handler<R, A>(
    State(service): State<Arc<ContractLifecycleService<R, A>>>,
    Json(submission): Json<ContractSubmission>,
) -> Response
where
    R: ContractRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.ingest(submission) {
        Ok(record) => {
            let view = record.status_view(Utc::now());
            (StatusCode::CREATED, Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R, A>(
    State(service): State<Arc<ContractLifecycleService<R, A>>>,
) -> Response
where
    R: ContractRepository + 'static,
    A: AlertPublisher + 'static,
{
    match service.list(Utc::now()) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R, A>(
    State(service): State<Arc<ContractLifecycleService<R, A>>>,
    Path(contract_id): Path<String>,
) -> Response
where
    R: ContractRepository + 'static,
    A: AlertPublisher + 'static,
{
    let id = ContractId(contract_id);
    match service.status_view(&id, Utc::now()) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn overrides_handler<R, A>(
    State(service): State<Arc<ContractLifecycleService<R, A>>>,
    Path(contract_id): Path<String>,
    Json(overrides): Json<ContractOverrides>,
) -> Response
where
    R: ContractRepository + 'static,
    A: AlertPublisher + 'static,
{
    let id = ContractId(contract_id);
    match service.apply_overrides(&id, overrides) {
        Ok(record) => (StatusCode::OK, Json(record.status_view(Utc::now()))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn dispatch_handler<R, A>(
    State(service): State<Arc<ContractLifecycleService<R, A>>>,
    request: Option<Json<DispatchRequest>>,
) -> Response
where
    R: ContractRepository + 'static,
    A: AlertPublisher + 'static,
{
    // Schedulers usually fire a bare POST; no body means "today".
    let today = request
        .and_then(|Json(request)| request.today)
        .unwrap_or_else(|| Utc::now().date_naive());
    match service.dispatch_due(today) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: ContractServiceError) -> Response {
    let status = match &err {
        ContractServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ContractServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ContractServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": err.to_string(),
    });
    (status, Json(payload)).into_response()
}
