//! API handlers for the thread and reply endpoints.

pub mod replies;
pub mod threads;

pub use replies::*;
pub use threads::*;

use crate::board::{BoardService, ReplyId, ThreadId};
use crate::web::error::ApiError;
use crate::AnonboardError;

/// Shared state for all handlers.
pub struct AppState {
    /// Board engine.
    pub service: BoardService,
}

impl AppState {
    /// Create application state around a board service.
    pub fn new(service: BoardService) -> Self {
        Self { service }
    }
}

/// Parse a thread id from a request; an unparsable id resolves to nothing.
pub(crate) fn parse_thread_id(raw: &str) -> Result<ThreadId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::from(AnonboardError::thread_not_found()))
}

/// Parse a reply id from a request; an unparsable id resolves to nothing.
///
/// The owning thread is resolved first, so a missing thread is reported
/// ahead of a malformed reply id.
pub(crate) async fn resolve_reply_id(
    state: &AppState,
    thread_id: ThreadId,
    raw: &str,
) -> Result<ReplyId, ApiError> {
    match raw.parse() {
        Ok(id) => Ok(id),
        Err(_) => {
            state.service.view_thread(thread_id).await?;
            Err(ApiError::from(AnonboardError::reply_not_found()))
        }
    }
}
