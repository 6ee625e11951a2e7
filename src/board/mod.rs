//! Board module for anonboard.
//!
//! This module provides the anonymous discussion engine:
//! - Thread and reply models (threads own their replies)
//! - Public views that strip moderation and password fields
//! - The repository boundary with SQLite and in-memory backends
//! - The board service implementing the thread/reply lifecycle

mod id;
mod memory_repository;
mod repository;
mod service;
mod sqlite_repository;
mod thread;
mod view;

pub use id::{ReplyId, ThreadId};
pub use memory_repository::InMemoryBoardRepository;
pub use repository::BoardRepository;
pub use service::{
    BoardService, DeleteOutcome, MAX_BOARD_NAME_LENGTH, MAX_TEXT_LENGTH, THREAD_LIST_LIMIT,
};
pub use sqlite_repository::SqliteBoardRepository;
pub use thread::{Reply, Thread, TOMBSTONE_TEXT};
pub use view::{ReplyView, ThreadView, REPLY_PREVIEW_COUNT};
