//! In-process implementation of [`BoardRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::id::{ReplyId, ThreadId};
use super::repository::BoardRepository;
use super::thread::{Reply, Thread};
use crate::Result;

/// A thread plus its insertion sequence, used to break bump-time ties.
struct Stored {
    seq: u64,
    thread: Thread,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    threads: HashMap<ThreadId, Stored>,
}

/// Repository keeping every thread in memory behind a single lock.
///
/// Each operation takes the lock once, so mutations of one aggregate are
/// serialized and never partially visible.
#[derive(Default)]
pub struct InMemoryBoardRepository {
    inner: RwLock<Inner>,
}

impl InMemoryBoardRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored threads across all boards.
    pub async fn len(&self) -> usize {
        self.inner.read().await.threads.len()
    }

    /// Whether the repository holds no threads.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BoardRepository for InMemoryBoardRepository {
    async fn create_thread(&self, thread: &Thread) -> Result<ThreadId> {
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.threads.insert(
            thread.id,
            Stored {
                seq,
                thread: thread.clone(),
            },
        );
        Ok(thread.id)
    }

    async fn find_threads_by_board(&self, board: &str, limit: usize) -> Result<Vec<Thread>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<&Stored> = inner
            .threads
            .values()
            .filter(|s| s.thread.board == board)
            .collect();
        matching.sort_by(|a, b| {
            b.thread
                .bumped_on
                .cmp(&a.thread.bumped_on)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(matching
            .into_iter()
            .take(limit)
            .map(|s| s.thread.clone())
            .collect())
    }

    async fn find_thread_by_id(&self, id: ThreadId) -> Result<Option<Thread>> {
        let inner = self.inner.read().await;
        Ok(inner.threads.get(&id).map(|s| s.thread.clone()))
    }

    async fn append_reply(&self, thread_id: ThreadId, reply: Reply) -> Result<Option<Thread>> {
        let mut inner = self.inner.write().await;
        Ok(inner.threads.get_mut(&thread_id).map(|s| {
            // Stamped under the write lock so concurrent appends stay ordered.
            s.thread.push_reply(reply, crate::datetime::now());
            s.thread.clone()
        }))
    }

    async fn delete_thread(&self, id: ThreadId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        Ok(inner.threads.remove(&id).is_some())
    }

    async fn set_thread_reported(&self, id: ThreadId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.threads.get_mut(&id) {
            Some(s) => {
                s.thread.reported = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_reply_reported(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let reply = inner
            .threads
            .get_mut(&thread_id)
            .and_then(|s| s.thread.reply_mut(reply_id));
        match reply {
            Some(reply) => {
                reply.reported = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn tombstone_reply(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let reply = inner
            .threads
            .get_mut(&thread_id)
            .and_then(|s| s.thread.reply_mut(reply_id));
        match reply {
            Some(reply) => {
                reply.tombstone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
