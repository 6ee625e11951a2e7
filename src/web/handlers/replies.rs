//! Reply handlers.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::board::ThreadView;
use crate::web::dto::{
    CreateReplyRequest, DeleteReplyRequest, ReportReplyRequest, ThreadQuery, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::{parse_thread_id, resolve_reply_id, AppState};

/// POST /api/replies/:board - Reply to a thread.
///
/// Responds with the whole updated thread.
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedJson(req): ValidatedJson<CreateReplyRequest>,
) -> Result<(StatusCode, Json<ThreadView>), ApiError> {
    let thread_id = parse_thread_id(&req.thread_id)?;
    let thread = state
        .service
        .create_reply(&board, thread_id, &req.text, &req.delete_password)
        .await?;

    Ok((StatusCode::CREATED, Json(thread)))
}

/// GET /api/replies/:board?thread_id= - View a thread with every reply.
pub async fn view_thread(
    State(state): State<Arc<AppState>>,
    Path(_board): Path<String>,
    query: Result<Query<ThreadQuery>, QueryRejection>,
) -> Result<Json<ThreadView>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let thread_id = parse_thread_id(&query.thread_id)?;
    let thread = state.service.view_thread(thread_id).await?;
    Ok(Json(thread))
}

/// DELETE /api/replies/:board - Delete a reply with its password.
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    Path(_board): Path<String>,
    ValidatedJson(req): ValidatedJson<DeleteReplyRequest>,
) -> Result<&'static str, ApiError> {
    let thread_id = parse_thread_id(&req.thread_id)?;
    let reply_id = resolve_reply_id(&state, thread_id, &req.reply_id).await?;
    let outcome = state
        .service
        .delete_reply(thread_id, reply_id, &req.delete_password)
        .await?;

    Ok(outcome.message())
}

/// PUT /api/replies/:board - Report a reply.
pub async fn report_reply(
    State(state): State<Arc<AppState>>,
    Path(_board): Path<String>,
    ValidatedJson(req): ValidatedJson<ReportReplyRequest>,
) -> Result<&'static str, ApiError> {
    let thread_id = parse_thread_id(&req.thread_id)?;
    let reply_id = resolve_reply_id(&state, thread_id, &req.reply_id).await?;
    state.service.report_reply(thread_id, reply_id).await?;
    Ok("reported")
}
