//! anonboard - anonymous, board-partitioned discussion service.
//!
//! Clients post threads and replies to named boards. Replying bumps a
//! thread to the top of its board, and threads and replies can be deleted
//! with the password chosen at posting time or reported for moderation.

pub mod board;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod secret;
pub mod web;

pub use board::{
    BoardRepository, BoardService, DeleteOutcome, InMemoryBoardRepository, ReplyId,
    SqliteBoardRepository, ThreadId, ThreadView,
};
pub use config::Config;
pub use db::Database;
pub use error::{AnonboardError, Result};
pub use secret::{Argon2Verifier, HashedSecret, SecretVerifier};
