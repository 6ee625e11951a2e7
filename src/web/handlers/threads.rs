//! Thread handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::board::ThreadView;
use crate::web::dto::{
    CreateThreadRequest, DeleteThreadRequest, ReportThreadRequest, ThreadCreatedResponse,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{parse_thread_id, AppState};

/// POST /api/threads/:board - Create a thread.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateThreadRequest>,
) -> Result<(StatusCode, Json<ThreadCreatedResponse>), ApiError> {
    let id = state
        .service
        .create_thread(&board, &req.text, &req.delete_password)
        .await?;

    Ok((StatusCode::CREATED, Json(ThreadCreatedResponse { id })))
}

/// GET /api/threads/:board - List the most recently bumped threads.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
) -> Result<Json<Vec<ThreadView>>, ApiError> {
    let threads = state.service.list_threads(&board).await?;
    Ok(Json(threads))
}

/// DELETE /api/threads/:board - Delete a thread with its password.
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path(_board): Path<String>,
    ValidatedJson(req): ValidatedJson<DeleteThreadRequest>,
) -> Result<&'static str, ApiError> {
    let thread_id = parse_thread_id(&req.thread_id)?;
    let outcome = state
        .service
        .delete_thread(thread_id, &req.delete_password)
        .await?;

    Ok(outcome.message())
}

/// PUT /api/threads/:board - Report a thread.
pub async fn report_thread(
    State(state): State<Arc<AppState>>,
    Path(_board): Path<String>,
    ValidatedJson(req): ValidatedJson<ReportThreadRequest>,
) -> Result<&'static str, ApiError> {
    let thread_id = parse_thread_id(&req.thread_id)?;
    state.service.report_thread(thread_id).await?;
    Ok("reported")
}
