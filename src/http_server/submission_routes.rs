//! Submission HTTP Routes
//!
//! Create, read, replace, delete and list form submissions. Every write is
//! validated against the active schema; only normalized records are stored.
//!
//! Repository calls may touch the disk, so they run on tokio's blocking pool.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::observability::{Event, Logger, MetricsRegistry};
use crate::schema::FormValidator;
use crate::submissions::{
    Page, PageQuery, PageRequest, Submission, SubmissionError, SubmissionReceipt,
    SubmissionRepository, SubmissionResult,
};

// ==================
// Shared State
// ==================

/// Submission state shared across handlers
pub struct SubmissionState {
    pub validator: FormValidator,
    pub repository: Arc<dyn SubmissionRepository>,
    pub metrics: Arc<MetricsRegistry>,
    pub max_page_limit: usize,
}

impl SubmissionState {
    /// Run a repository operation on the blocking pool
    async fn with_repository<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn SubmissionRepository) -> SubmissionResult<T> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        tokio::task::spawn_blocking(move || op(repository.as_ref()))
            .await
            .map_err(|e| store_failure(SubmissionError::Storage(format!("store task failed: {}", e))))?
            .map_err(store_failure)
    }
}

// ==================
// Response Types
// ==================

/// Error body. `errors` is present only for validation failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Submission not found")),
    )
}

fn store_failure(err: SubmissionError) -> ApiError {
    Logger::event(Event::StoreFailed)
        .field("reason", &err)
        .emit();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.to_string())))
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| not_found())
}

/// Unreadable bodies keep axum's status but answer in the JSON error shape.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        (
            rejection.status(),
            Json(ErrorResponse::new(rejection.body_text())),
        )
    })
}

// ==================
// Routes
// ==================

/// Create submission routes
pub fn submission_routes(state: Arc<SubmissionState>) -> Router {
    Router::new()
        .route(
            "/submissions",
            get(list_submissions_handler).post(create_submission_handler),
        )
        .route(
            "/submissions/:id",
            get(get_submission_handler)
                .put(update_submission_handler)
                .delete(delete_submission_handler),
        )
        .with_state(state)
}

/// Validate a payload, returning the normalized record or a 400 response.
fn validated(
    state: &SubmissionState,
    payload: &Value,
    id: Option<Uuid>,
) -> Result<Map<String, Value>, ApiError> {
    let result = state.validator.validate(payload);
    state.metrics.record_validation(result.is_valid);

    let errors = match result.into_normalized() {
        Ok(data) => return Ok(data),
        Err(errors) => errors,
    };

    let mut line = Logger::event(Event::SubmissionRejected).field("error_count", errors.len());
    if let Some(id) = id {
        line = line.field("id", id);
    }
    line.emit();

    Err((
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            message: "Validation failed".to_string(),
            errors: Some(
                errors
                    .into_iter()
                    .map(|(name, err)| (name, err.to_string()))
                    .collect(),
            ),
        }),
    ))
}

async fn create_submission_handler(
    State(state): State<Arc<SubmissionState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionReceipt>), ApiError> {
    let data = validated(&state, &json_body(body)?, None)?;
    let submission = state.with_repository(move |repo| repo.create(data)).await?;

    state.metrics.increment_created();
    Logger::event(Event::SubmissionCreated)
        .field("id", submission.id)
        .emit();

    Ok((StatusCode::CREATED, Json(SubmissionReceipt::from(&submission))))
}

async fn list_submissions_handler(
    State(state): State<Arc<SubmissionState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Submission>>, ApiError> {
    let request = PageRequest::from_query(&query, state.max_page_limit);
    let page = state.with_repository(move |repo| repo.list(&request)).await?;
    Ok(Json(page))
}

async fn get_submission_handler(
    State(state): State<Arc<SubmissionState>>,
    Path(id): Path<String>,
) -> Result<Json<Submission>, ApiError> {
    let id = parse_id(&id)?;
    state
        .with_repository(move |repo| repo.get(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_submission_handler(
    State(state): State<Arc<SubmissionState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Submission>, ApiError> {
    let id = parse_id(&id)?;
    let data = validated(&state, &json_body(body)?, Some(id))?;
    let updated = state
        .with_repository(move |repo| repo.update(id, data))
        .await?
        .ok_or_else(not_found)?;

    state.metrics.increment_updated();
    Logger::event(Event::SubmissionUpdated).field("id", id).emit();

    Ok(Json(updated))
}

async fn delete_submission_handler(
    State(state): State<Arc<SubmissionState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !state.with_repository(move |repo| repo.delete(id)).await? {
        return Err(not_found());
    }

    state.metrics.increment_deleted();
    Logger::event(Event::SubmissionDeleted).field("id", id).emit();

    Ok(StatusCode::NO_CONTENT)
}
