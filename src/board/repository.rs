//! Persistence boundary for thread aggregates.

use async_trait::async_trait;

use super::id::{ReplyId, ThreadId};
use super::thread::{Reply, Thread};
use crate::Result;

/// Storage of [`Thread`] aggregates and their embedded replies.
///
/// Every method touches a single aggregate and applies atomically: a
/// concurrent call against the same thread observes either all of a
/// mutation or none of it. Methods that target a thread or reply report a
/// missing target through `Option`/`bool` rather than an error.
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Persist a new thread (with whatever replies it already holds).
    async fn create_thread(&self, thread: &Thread) -> Result<ThreadId>;

    /// Threads on a board, most recently bumped first, at most `limit`.
    ///
    /// Threads with equal bump timestamps come back newest-inserted first.
    async fn find_threads_by_board(&self, board: &str, limit: usize) -> Result<Vec<Thread>>;

    /// Load a thread with all of its replies.
    async fn find_thread_by_id(&self, id: ThreadId) -> Result<Option<Thread>>;

    /// Append a reply and bump the thread in one step.
    ///
    /// The repository stamps the reply's `created_on` and the thread's
    /// `bumped_on` with a single instant read while it holds the thread for
    /// writing, overwriting whatever `created_on` the caller supplied.
    /// Stamps never decrease along a thread's reply sequence.
    ///
    /// Returns the updated thread, or `None` if it does not exist.
    async fn append_reply(&self, thread_id: ThreadId, reply: Reply) -> Result<Option<Thread>>;

    /// Remove a thread and all of its replies.
    async fn delete_thread(&self, id: ThreadId) -> Result<bool>;

    /// Set the thread's reported flag.
    async fn set_thread_reported(&self, id: ThreadId) -> Result<bool>;

    /// Set a reply's reported flag.
    async fn set_reply_reported(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<bool>;

    /// Replace a reply's text with the tombstone marker, leaving every other
    /// field untouched.
    async fn tombstone_reply(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<bool>;
}
