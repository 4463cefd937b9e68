use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::domain::{ApplicationId, CreditCheckRequest, HistoryId, Ssn};
use super::provider::ScoreProvider;
use super::repository::{CreditRepository, RepositoryError};
use super::requests::{
    ApplicationFilter, CreateHistoryRequest, CreateScoreRequest, LoanApplicationRequest,
    UpdateHistoryRequest, UpdateScoreRequest,
};
use super::service::{CreditBureauService, CreditServiceError, ScoreWrite};

type SharedService<R, P> = Arc<CreditBureauService<R, P>>;

/// Router builder exposing the credit bureau endpoints.
pub fn credit_router<R, P>(service: SharedService<R, P>) -> Router
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/credit/check", post(check_handler::<R, P>))
        .route("/api/v1/credit/score", post(create_score_handler::<R, P>))
        .route(
            "/api/v1/credit/score/:ssn",
            get(score_handler::<R, P>).put(update_score_handler::<R, P>),
        )
        .route("/api/v1/credit/history", post(create_history_handler::<R, P>))
        .route("/api/v1/credit/history/:ssn", get(history_handler::<R, P>))
        .route(
            "/api/v1/credit/history/:ssn/delinquent",
            get(delinquent_history_handler::<R, P>),
        )
        .route(
            "/api/v1/credit/history/record/:id",
            put(update_history_handler::<R, P>),
        )
        .route(
            "/api/v1/credit/applications",
            post(submit_application_handler::<R, P>).get(list_applications_handler::<R, P>),
        )
        .route(
            "/api/v1/credit/applications/:application_id",
            get(application_handler::<R, P>),
        )
        .with_state(service)
}

fn error_response(err: CreditServiceError) -> Response {
    let status = match &err {
        CreditServiceError::Input(_) | CreditServiceError::Evaluation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CreditServiceError::ScoreNotFound(_)
        | CreditServiceError::HistoryNotFound(_)
        | CreditServiceError::ApplicationNotFound(_)
        | CreditServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CreditServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CreditServiceError::Repository(RepositoryError::Unavailable(_)) => {
            error!(error = %err, "credit store unavailable");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn check_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Json(request): Json<CreditCheckRequest>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.perform_credit_check(&request) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(ssn): Path<String>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.get_score(&Ssn(ssn)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_score_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Json(request): Json<CreateScoreRequest>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.create_score(request) {
        Ok((record, ScoreWrite::Created)) => (StatusCode::CREATED, Json(record)).into_response(),
        Ok((record, ScoreWrite::Updated)) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_score_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(ssn): Path<String>,
    Json(request): Json<UpdateScoreRequest>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.update_score(&Ssn(ssn), request) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HistoryQuery {
    #[serde(default)]
    active_only: bool,
}

pub(crate) async fn history_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(ssn): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.get_history(&Ssn(ssn), query.active_only) {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delinquent_history_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(ssn): Path<String>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.delinquent_history(&Ssn(ssn)) {
        Ok(history) => (StatusCode::OK, Json(history)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_history_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Json(request): Json<CreateHistoryRequest>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.create_history(request) {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_history_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateHistoryRequest>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.update_history(HistoryId(id), request) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_application_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Json(request): Json<LoanApplicationRequest>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.submit_application(request) {
        Ok(submitted) => (StatusCode::CREATED, Json(submitted)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_applications_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Query(filter): Query<ApplicationFilter>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.list_applications(&filter) {
        Ok(applications) => (StatusCode::OK, Json(applications)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn application_handler<R, P>(
    State(service): State<SharedService<R, P>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: CreditRepository + 'static,
    P: ScoreProvider + ?Sized + 'static,
{
    match service.get_application(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(err) => error_response(err),
    }
}
