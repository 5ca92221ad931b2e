use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::super::domain::ReportingPeriod;
use super::super::filter::ActivityFilter;
use super::guard::ActivitySubmission;
use super::repository::{ActivityRepository, GenbaDirectory, RepositoryError};
use super::service::{ActivityServiceError, GenbaActivityService};

/// Router exposing activity intake and listing.
pub fn activity_router<R, D>(service: Arc<GenbaActivityService<R, D>>) -> Router
where
    R: ActivityRepository + 'static,
    D: GenbaDirectory + 'static,
{
    Router::new()
        .route(
            "/api/v1/genba/activities",
            post(submit_handler::<R, D>).get(list_handler::<R, D>),
        )
        .with_state(service)
}

/// `month` is zero-based, matching [`ReportingPeriod`].
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ActivityListQuery {
    year: Option<i32>,
    month: Option<u32>,
    #[serde(default)]
    search: String,
}

impl ActivityListQuery {
    fn into_filter(self) -> Result<ActivityFilter, String> {
        let filter = ActivityFilter::default().with_search(self.search);
        match (self.year, self.month) {
            (Some(year), Some(month)) => ReportingPeriod::new(year, month)
                .map(|period| filter.with_period(period))
                .map_err(|err| err.to_string()),
            (None, None) => Ok(filter),
            _ => Err("year and month must be supplied together".to_string()),
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, D>(
    State(service): State<Arc<GenbaActivityService<R, D>>>,
    axum::Json(submission): axum::Json<ActivitySubmission>,
) -> Response
where
    R: ActivityRepository + 'static,
    D: GenbaDirectory + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(ActivityServiceError::Validation(error)) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        Err(ActivityServiceError::Repository(RepositoryError::Conflict)) => {
            error_response(StatusCode::CONFLICT, "activity already exists")
        }
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn list_handler<R, D>(
    State(service): State<Arc<GenbaActivityService<R, D>>>,
    Query(query): Query<ActivityListQuery>,
) -> Response
where
    R: ActivityRepository + 'static,
    D: GenbaDirectory + 'static,
{
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match service.list(&filter) {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}
