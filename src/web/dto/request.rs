//! Request DTOs for the thread and reply endpoints.
//!
//! Ids arrive as raw strings; handlers parse them so that an id which does
//! not parse is reported the same way as one that does not resolve.

use serde::Deserialize;
use validator::Validate;

use super::validation::not_empty_trimmed;

/// POST /api/threads/:board
#[derive(Debug, Deserialize, Validate)]
pub struct CreateThreadRequest {
    /// Thread body.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub text: String,
    /// Password required to delete the thread later.
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub delete_password: String,
}

/// DELETE /api/threads/:board
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteThreadRequest {
    /// Target thread.
    pub thread_id: String,
    /// Password given when the thread was created.
    pub delete_password: String,
}

/// PUT /api/threads/:board
#[derive(Debug, Deserialize, Validate)]
pub struct ReportThreadRequest {
    /// Target thread.
    pub thread_id: String,
}

/// POST /api/replies/:board
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReplyRequest {
    /// Thread to reply to.
    pub thread_id: String,
    /// Reply body.
    #[validate(custom(function = "not_empty_trimmed"))]
    pub text: String,
    /// Password required to delete the reply later.
    #[validate(length(min = 1, message = "Must not be empty"))]
    pub delete_password: String,
}

/// DELETE /api/replies/:board
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteReplyRequest {
    /// Owning thread.
    pub thread_id: String,
    /// Target reply.
    pub reply_id: String,
    /// Password given when the reply was created.
    pub delete_password: String,
}

/// PUT /api/replies/:board
#[derive(Debug, Deserialize, Validate)]
pub struct ReportReplyRequest {
    /// Owning thread.
    pub thread_id: String,
    /// Target reply.
    pub reply_id: String,
}

/// Query for GET /api/replies/:board
#[derive(Debug, Deserialize)]
pub struct ThreadQuery {
    /// Thread to view.
    pub thread_id: String,
}
