use crate::infra::{deserialize_optional_date, AppState, GenbaState};
use axum::extract::{Path, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use genba_compliance::error::AppError;
use genba_compliance::workflows::genba::activities::{
    activity_router, ActivityRepository, GenbaActivityService, GenbaDirectory,
};
use genba_compliance::workflows::genba::report::views::ComplianceReportSummary;
use genba_compliance::workflows::genba::{
    load_dashboard, missed_days, month_calendar, parse_calendar_date, ActivityFilter,
    ActivityRecord, CalendarDay, ComplianceReport, ComplianceScore, EntityKind, ReportingEntity,
    ReportingPeriod, TaskBoard, TaskFilter, TaskRecord, TaskStatus, TaskView, UiPreferences,
    WorkOrder, WorkOrderFilter, WorkOrderView,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

pub(crate) fn with_genba_routes<R, D>(service: Arc<GenbaActivityService<R, D>>) -> axum::Router
where
    R: ActivityRepository + 'static,
    D: GenbaDirectory + 'static,
{
    activity_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/genba/score", post(score_endpoint))
        .route("/api/v1/genba/calendar", post(calendar_endpoint))
        .route("/api/v1/genba/activities/search", post(activity_search_endpoint))
        .route("/api/v1/genba/report", get(report_endpoint))
        .route("/api/v1/work-orders/search", post(work_order_search_endpoint))
        .route("/api/v1/tasks", get(list_tasks).post(add_task))
        .route("/api/v1/tasks/search", post(search_tasks))
        .route(
            "/api/v1/tasks/:task_id",
            patch(update_task_status).delete(remove_task),
        )
        .route(
            "/api/v1/preferences/ui",
            get(ui_preferences).put(save_ui_preferences),
        )
        .route("/api/v1/preferences/ui/sidebar/toggle", post(toggle_sidebar))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Score one entity. `activities` may contain records of other entities or
/// months; they are scoped before counting.
#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) entity: ReportingEntity,
    pub(crate) period: ReportingPeriod,
    #[serde(default)]
    pub(crate) activities: Vec<ActivityRecord>,
    /// Daily reporters on the department roster; departments only.
    #[serde(default)]
    pub(crate) expected_reporters: Option<usize>,
}

pub(crate) async fn score_endpoint(
    Extension(state): Extension<GenbaState>,
    Json(payload): Json<ScoreRequest>,
) -> Json<ComplianceScore> {
    let ScoreRequest {
        entity,
        period,
        activities,
        expected_reporters,
    } = payload;

    let score = match entity.kind {
        EntityKind::Department => state.scorer.score_department(
            &entity,
            expected_reporters.unwrap_or_default(),
            &activities,
            period,
        ),
        EntityKind::Area | EntityKind::Employee => {
            state
                .scorer
                .score(&entity, entity.records_for(&activities), period)
        }
    };

    debug!(entity = %entity.id, %period, percentage = score.percentage, "scored entity");
    Json(score)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CalendarRequest {
    pub(crate) entity: ReportingEntity,
    pub(crate) period: ReportingPeriod,
    #[serde(default)]
    pub(crate) activities: Vec<ActivityRecord>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CalendarResponse {
    pub(crate) entity_id: String,
    pub(crate) period_label: String,
    pub(crate) today: NaiveDate,
    pub(crate) missed_days: usize,
    pub(crate) score: ComplianceScore,
    pub(crate) days: Vec<CalendarDay>,
}

pub(crate) async fn calendar_endpoint(
    Extension(state): Extension<GenbaState>,
    Json(payload): Json<CalendarRequest>,
) -> Json<CalendarResponse> {
    let CalendarRequest {
        entity,
        period,
        activities,
        today,
    } = payload;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let owned = entity.records_for(&activities);
    let days = month_calendar(
        &entity,
        owned.iter().copied(),
        period,
        today,
        state.scorer.policy(),
    );
    let score = state.scorer.score(&entity, owned.iter().copied(), period);

    Json(CalendarResponse {
        entity_id: entity.id,
        period_label: period.label(),
        today,
        missed_days: missed_days(&days),
        score,
        days,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRequest<T, F> {
    pub(crate) records: Vec<T>,
    #[serde(default)]
    pub(crate) filter: F,
}

pub(crate) async fn activity_search_endpoint(
    Json(payload): Json<SearchRequest<ActivityRecord, ActivityFilter>>,
) -> Json<Vec<ActivityRecord>> {
    Json(payload.filter.apply(&payload.records))
}

pub(crate) async fn work_order_search_endpoint(
    Json(payload): Json<SearchRequest<WorkOrder, WorkOrderFilter>>,
) -> Json<Vec<WorkOrderView>> {
    let matched = payload.filter.apply(&payload.records);
    Json(matched.iter().map(WorkOrderView::from).collect())
}

/// `month` is zero-based.
#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    pub(crate) year: i32,
    pub(crate) month: u32,
    #[serde(default)]
    pub(crate) today: Option<String>,
}

pub(crate) async fn report_endpoint(
    Extension(state): Extension<GenbaState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ComplianceReportSummary>, AppError> {
    let period = ReportingPeriod::new(query.year, query.month)?;
    let today = match query.today.as_deref() {
        Some(raw) => parse_calendar_date(raw)?,
        None => Local::now().date_naive(),
    };

    let snapshot = load_dashboard(&state.store, period).await?;
    let report = ComplianceReport::build(&snapshot, today, &state.scorer);
    Ok(Json(report.summary()))
}

fn task_views(tasks: &[TaskRecord]) -> Vec<TaskView> {
    tasks.iter().map(TaskView::from).collect()
}

pub(crate) async fn list_tasks(
    Extension(state): Extension<GenbaState>,
) -> Result<Json<Vec<TaskView>>, AppError> {
    let board = TaskBoard::load(&state.preferences)?;
    Ok(Json(task_views(board.tasks())))
}

pub(crate) async fn add_task(
    Extension(state): Extension<GenbaState>,
    Json(task): Json<TaskRecord>,
) -> Result<impl IntoResponse, AppError> {
    let view = TaskView::from(&task);
    TaskBoard::update(&state.preferences, |board| board.add(task))?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn search_tasks(
    Extension(state): Extension<GenbaState>,
    Json(filter): Json<TaskFilter>,
) -> Result<Json<Vec<TaskView>>, AppError> {
    let board = TaskBoard::load(&state.preferences)?;
    Ok(Json(task_views(&filter.apply(board.tasks()))))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdate {
    pub(crate) status: TaskStatus,
}

pub(crate) async fn update_task_status(
    Extension(state): Extension<GenbaState>,
    Path(task_id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Vec<TaskView>>, AppError> {
    let tasks = TaskBoard::update(&state.preferences, |board| {
        board.set_status(&task_id, update.status)?;
        Ok(task_views(board.tasks()))
    })?;
    Ok(Json(tasks))
}

pub(crate) async fn remove_task(
    Extension(state): Extension<GenbaState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskView>, AppError> {
    let removed = TaskBoard::update(&state.preferences, |board| board.remove(&task_id))?;
    Ok(Json(TaskView::from(&removed)))
}

pub(crate) async fn ui_preferences(
    Extension(state): Extension<GenbaState>,
) -> Result<Json<UiPreferences>, AppError> {
    Ok(Json(UiPreferences::load(&state.preferences)?))
}

pub(crate) async fn save_ui_preferences(
    Extension(state): Extension<GenbaState>,
    Json(preferences): Json<UiPreferences>,
) -> Result<Json<UiPreferences>, AppError> {
    preferences.save(&state.preferences)?;
    Ok(Json(preferences))
}

pub(crate) async fn toggle_sidebar(
    Extension(state): Extension<GenbaState>,
) -> Result<Json<UiPreferences>, AppError> {
    Ok(Json(UiPreferences::toggle_stored_sidebar(&state.preferences)?))
}
