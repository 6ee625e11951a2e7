//! Public projections of threads and replies.
//!
//! These are the only shapes that leave the service. They have no field for
//! the reported flag or the password hash, so neither can leak into a
//! response.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::{ReplyId, ThreadId};
use super::thread::{Reply, Thread};

/// Number of replies shown per thread in a board listing.
pub const REPLY_PREVIEW_COUNT: usize = 3;

/// Redacted view of a thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadView {
    /// Thread ID.
    #[serde(rename = "_id")]
    pub id: ThreadId,
    /// Board name.
    pub board: String,
    /// Thread body.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last bump timestamp.
    pub bumped_on: DateTime<Utc>,
    /// Replies included in this view, oldest first.
    pub replies: Vec<ReplyView>,
    /// Total number of replies in the thread, including any not shown.
    pub replycount: usize,
}

impl ThreadView {
    /// Full view with every reply.
    pub fn full(thread: &Thread) -> Self {
        Self::with_replies(thread, &thread.replies)
    }

    /// Listing view with only the [`REPLY_PREVIEW_COUNT`] most recent replies,
    /// still oldest first.
    pub fn preview(thread: &Thread) -> Self {
        let skip = thread.replies.len().saturating_sub(REPLY_PREVIEW_COUNT);
        Self::with_replies(thread, &thread.replies[skip..])
    }

    fn with_replies(thread: &Thread, replies: &[Reply]) -> Self {
        Self {
            id: thread.id,
            board: thread.board.clone(),
            text: thread.text.clone(),
            created_on: thread.created_on,
            bumped_on: thread.bumped_on,
            replies: replies.iter().map(ReplyView::from).collect(),
            replycount: thread.replies.len(),
        }
    }
}

/// Redacted view of a reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyView {
    /// Reply ID.
    #[serde(rename = "_id")]
    pub id: ReplyId,
    /// Reply body (or the tombstone marker).
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
}

impl From<&Reply> for ReplyView {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id,
            text: reply.text.clone(),
            created_on: reply.created_on,
        }
    }
}
