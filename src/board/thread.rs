//! Thread and reply models for anonboard.
//!
//! A [`Thread`] is the aggregate root; its [`Reply`] values live only inside
//! it, in insertion (chronological) order.

use chrono::{DateTime, Utc};

use super::id::{ReplyId, ThreadId};
use crate::secret::HashedSecret;

/// Text a reply is overwritten with when its author deletes it.
pub const TOMBSTONE_TEXT: &str = "[deleted]";

/// A top-level post on a board, owning its replies.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    /// Unique thread ID.
    pub id: ThreadId,
    /// Name of the board the thread was posted to.
    pub board: String,
    /// Thread body.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last bump; equals `created_on` until the first reply.
    pub bumped_on: DateTime<Utc>,
    /// Hashed deletion password.
    pub secret_hash: HashedSecret,
    /// Moderation flag. Once set it is never cleared.
    pub reported: bool,
    /// Replies, oldest first.
    pub replies: Vec<Reply>,
}

impl Thread {
    /// Build a fresh, unreported thread with no replies.
    pub fn new(
        board: impl Into<String>,
        text: impl Into<String>,
        secret_hash: HashedSecret,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ThreadId::new(),
            board: board.into(),
            text: text.into(),
            created_on: now,
            bumped_on: now,
            secret_hash,
            reported: false,
            replies: Vec::new(),
        }
    }

    /// Find a reply by ID.
    pub fn reply(&self, id: ReplyId) -> Option<&Reply> {
        self.replies.iter().find(|r| r.id == id)
    }

    /// Find a reply by ID for mutation.
    pub fn reply_mut(&mut self, id: ReplyId) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| r.id == id)
    }

    /// Append a reply and bump the thread, stamping both with `now`.
    ///
    /// The stamp is clamped to the current bump so reply timestamps never
    /// decrease along the reply sequence.
    pub fn push_reply(&mut self, mut reply: Reply, now: DateTime<Utc>) {
        let at = now.max(self.bumped_on);
        reply.created_on = at;
        self.replies.push(reply);
        self.bumped_on = at;
    }
}

/// A reply inside a thread.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Reply ID, unique within the owning thread.
    pub id: ReplyId,
    /// Reply body, or [`TOMBSTONE_TEXT`] after deletion.
    pub text: String,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Hashed deletion password.
    pub secret_hash: HashedSecret,
    /// Moderation flag. Once set it is never cleared.
    pub reported: bool,
}

impl Reply {
    /// Build a fresh, unreported reply.
    pub fn new(text: impl Into<String>, secret_hash: HashedSecret, now: DateTime<Utc>) -> Self {
        Self {
            id: ReplyId::new(),
            text: text.into(),
            created_on: now,
            secret_hash,
            reported: false,
        }
    }

    /// Replace the text with the tombstone marker.
    pub fn tombstone(&mut self) {
        self.text = TOMBSTONE_TEXT.to_string();
    }
}
