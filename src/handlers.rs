use crate::errors::AppError;
use crate::models::{
    AppSettings, AttendanceRecord, DayQuery, DaySheet, EditSubjectRequest, ExportFormat,
    MarkRequest, NewSubjectRequest, StateResponse, StatsResponse, Subject, UnmarkQuery,
};
use crate::state::AppState;
use crate::stats::overview;
use crate::tracker::{Change, Tracker};
use crate::transfer::{export_document, export_filename, import_document, render_document};
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Local, NaiveDate, Utc};
use tracing::{info, warn};

pub async fn index() -> Html<String> {
    Html(render_index(&today_string()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let tracker = state.tracker.lock().await;
    Json(state_response(&tracker))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let tracker = state.tracker.lock().await;
    let subjects = tracker.stats();
    let overview = overview(&subjects, tracker.records());
    Json(StatsResponse { subjects, overview })
}

pub async fn add_subject(
    State(state): State<AppState>,
    Json(payload): Json<NewSubjectRequest>,
) -> Result<(StatusCode, Json<Subject>), AppError> {
    let mut tracker = state.tracker.lock().await;
    let (subject, change) = tracker
        .add_subject(&payload.name, payload.color.as_deref(), payload.min_attendance)
        .ok_or_else(|| AppError::bad_request("subject name must not be blank"))?;

    commit(&state, &tracker, change).await;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn edit_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EditSubjectRequest>,
) -> Result<Json<Subject>, AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("subject name must not be blank"));
    }

    let mut tracker = state.tracker.lock().await;
    let (subject, change) = tracker
        .edit_subject(&id, name, &payload.color, payload.min_attendance)
        .ok_or_else(|| AppError::not_found(format!("unknown subject {id}")))?;

    commit(&state, &tracker, change).await;
    Ok(Json(subject))
}

pub async fn delete_subject(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let mut tracker = state.tracker.lock().await;
    if let Some(change) = tracker.delete_subject(&id) {
        commit(&state, &tracker, change).await;
    }
    StatusCode::NO_CONTENT
}

pub async fn day_sheet(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<DaySheet>, AppError> {
    let date = match query.date {
        Some(date) => parse_date(&date)?,
        None => today_string(),
    };
    let tracker = state.tracker.lock().await;
    Ok(Json(tracker.day_sheet(&date)))
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(payload): Json<MarkRequest>,
) -> Result<Json<AttendanceRecord>, AppError> {
    let date = parse_date(&payload.date)?;

    let mut tracker = state.tracker.lock().await;
    if tracker.subject(&payload.subject_id).is_none() {
        return Err(AppError::not_found(format!(
            "unknown subject {}",
            payload.subject_id
        )));
    }
    let (record, change) = tracker.mark_attendance(&payload.subject_id, &date, payload.status);

    commit(&state, &tracker, change).await;
    Ok(Json(record))
}

pub async fn unmark_attendance(
    State(state): State<AppState>,
    Query(query): Query<UnmarkQuery>,
) -> Result<StatusCode, AppError> {
    let date = parse_date(&query.date)?;

    let mut tracker = state.tracker.lock().await;
    if let Some(change) = tracker.unmark_attendance(&query.subject_id, &date) {
        commit(&state, &tracker, change).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<AppSettings>,
) -> Json<AppSettings> {
    let mut tracker = state.tracker.lock().await;
    let change = tracker.update_settings(settings);
    commit(&state, &tracker, change).await;
    Json(tracker.settings().clone())
}

pub async fn export_data(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tracker = state.tracker.lock().await;
    if tracker.settings().export_format == ExportFormat::Csv {
        warn!("csv export is not available, exporting json");
    }

    let now = Utc::now();
    let document = export_document(&tracker, now);
    let body = render_document(&document).map_err(AppError::internal)?;
    let filename = export_filename(now.date_naive(), ExportFormat::Json);
    info!(%filename, subjects = document.subjects.len(), "exported data");

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

pub async fn import_data(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<StateResponse>, AppError> {
    let document = import_document(&body).inspect_err(|err| warn!("import rejected: {err}"))?;

    let mut tracker = state.tracker.lock().await;
    let change = tracker.replace_all(document);
    commit(&state, &tracker, change).await;
    Ok(Json(state_response(&tracker)))
}

async fn commit(state: &AppState, tracker: &Tracker, change: Change) {
    if !tracker.persist(&state.persistence, change).await {
        warn!(?change, "changes kept in memory only");
    }
}

fn state_response(tracker: &Tracker) -> StateResponse {
    let stats = tracker.stats();
    let overview = overview(&stats, tracker.records());
    StateResponse {
        subjects: tracker.subjects().to_vec(),
        attendance: tracker.records().to_vec(),
        settings: tracker.settings().clone(),
        stats,
        overview,
    }
}

fn parse_date(value: &str) -> Result<String, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| AppError::bad_request(format!("invalid date '{value}', expected YYYY-MM-DD")))
}

fn today_string() -> String {
    Local::now().date_naive().to_string()
}
