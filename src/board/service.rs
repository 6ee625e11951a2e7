//! Board service for anonboard.
//!
//! Implements the thread and reply lifecycle on top of a [`BoardRepository`]
//! and a [`SecretVerifier`]. The service keeps no state between calls; every
//! operation re-reads what it needs from the repository.

use std::sync::Arc;

use tracing::{info, warn};

use crate::secret::{HashedSecret, SecretVerifier};
use crate::{AnonboardError, Result};

use super::id::{ReplyId, ThreadId};
use super::repository::BoardRepository;
use super::thread::{Reply, Thread};
use super::view::ThreadView;

/// Maximum number of threads returned by a board listing.
pub const THREAD_LIST_LIMIT: usize = 10;

/// Maximum length for thread and reply text (in characters).
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Maximum length for a board name (in characters).
pub const MAX_BOARD_NAME_LENGTH: usize = 64;

/// Result of a password-gated delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The password matched and the delete was applied.
    Deleted,
    /// The password did not match; nothing changed.
    IncorrectPassword,
}

impl DeleteOutcome {
    /// Message reported to clients.
    pub fn message(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "success",
            DeleteOutcome::IncorrectPassword => "incorrect password",
        }
    }
}

/// Validate and normalize a board name.
fn validate_board(board: &str) -> Result<&str> {
    let board = board.trim();
    if board.is_empty() {
        return Err(AnonboardError::Validation(
            "board name must not be empty".to_string(),
        ));
    }
    if board.chars().count() > MAX_BOARD_NAME_LENGTH {
        return Err(AnonboardError::Validation(format!(
            "board name is too long (max {} characters)",
            MAX_BOARD_NAME_LENGTH
        )));
    }
    Ok(board)
}

/// Validate thread or reply text.
fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AnonboardError::Validation(
            "text must not be empty".to_string(),
        ));
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err(AnonboardError::Validation(format!(
            "text is too long (max {} characters)",
            MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

/// Validate a new deletion password.
fn validate_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        return Err(AnonboardError::Validation(
            "delete_password must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Service for thread and reply operations.
#[derive(Clone)]
pub struct BoardService {
    repo: Arc<dyn BoardRepository>,
    verifier: Arc<dyn SecretVerifier>,
}

impl BoardService {
    /// Create a new service over a repository and a secret verifier.
    pub fn new(repo: Arc<dyn BoardRepository>, verifier: Arc<dyn SecretVerifier>) -> Self {
        Self { repo, verifier }
    }

    /// Hash a password off the async executor.
    async fn hash_secret(&self, secret: &str) -> Result<HashedSecret> {
        let verifier = Arc::clone(&self.verifier);
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || verifier.hash(&secret))
            .await
            .map_err(|e| AnonboardError::Secret(e.to_string()))?
    }

    /// Check a password against a stored hash off the async executor.
    async fn verify_secret(&self, secret: &str, hashed: &HashedSecret) -> Result<bool> {
        let verifier = Arc::clone(&self.verifier);
        let secret = secret.to_string();
        let hashed = hashed.clone();
        tokio::task::spawn_blocking(move || verifier.verify(&secret, &hashed))
            .await
            .map_err(|e| AnonboardError::Secret(e.to_string()))
    }

    async fn load_thread(&self, thread_id: ThreadId) -> Result<Thread> {
        self.repo
            .find_thread_by_id(thread_id)
            .await?
            .ok_or_else(AnonboardError::thread_not_found)
    }

    /// Create a new thread on a board and return its id.
    pub async fn create_thread(&self, board: &str, text: &str, secret: &str) -> Result<ThreadId> {
        let board = validate_board(board)?;
        validate_text(text)?;
        validate_secret(secret)?;

        let secret_hash = self.hash_secret(secret).await?;
        let thread = Thread::new(board, text, secret_hash, crate::datetime::now());
        let id = self.repo.create_thread(&thread).await?;

        info!(board = %board, thread_id = %id, "Thread created");
        Ok(id)
    }

    /// List the most recently bumped threads on a board.
    ///
    /// Returns at most [`THREAD_LIST_LIMIT`] threads, each with only its
    /// latest replies.
    pub async fn list_threads(&self, board: &str) -> Result<Vec<ThreadView>> {
        let board = validate_board(board)?;
        let threads = self
            .repo
            .find_threads_by_board(board, THREAD_LIST_LIMIT)
            .await?;
        Ok(threads.iter().map(ThreadView::preview).collect())
    }

    /// Append a reply to a thread and bump it.
    ///
    /// The repository stamps the reply's creation time and the thread's new
    /// bump time with the same instant. Returns the full updated thread.
    pub async fn create_reply(
        &self,
        board: &str,
        thread_id: ThreadId,
        text: &str,
        secret: &str,
    ) -> Result<ThreadView> {
        let board = validate_board(board)?;
        validate_text(text)?;
        validate_secret(secret)?;

        let secret_hash = self.hash_secret(secret).await?;
        let reply = Reply::new(text, secret_hash, crate::datetime::now());
        let reply_id = reply.id;

        let thread = self
            .repo
            .append_reply(thread_id, reply)
            .await?
            .ok_or_else(AnonboardError::thread_not_found)?;

        info!(board = %board, thread_id = %thread_id, reply_id = %reply_id, "Reply created");
        Ok(ThreadView::full(&thread))
    }

    /// Get a thread with every reply.
    pub async fn view_thread(&self, thread_id: ThreadId) -> Result<ThreadView> {
        let thread = self.load_thread(thread_id).await?;
        Ok(ThreadView::full(&thread))
    }

    /// Permanently remove a thread and its replies if the password matches.
    pub async fn delete_thread(&self, thread_id: ThreadId, secret: &str) -> Result<DeleteOutcome> {
        let thread = self.load_thread(thread_id).await?;

        if !self.verify_secret(secret, &thread.secret_hash).await? {
            warn!(thread_id = %thread_id, "Thread delete rejected: incorrect password");
            return Ok(DeleteOutcome::IncorrectPassword);
        }

        if !self.repo.delete_thread(thread_id).await? {
            return Err(AnonboardError::thread_not_found());
        }

        info!(thread_id = %thread_id, "Thread deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Flag a thread for moderation.
    pub async fn report_thread(&self, thread_id: ThreadId) -> Result<()> {
        if !self.repo.set_thread_reported(thread_id).await? {
            return Err(AnonboardError::thread_not_found());
        }

        info!(thread_id = %thread_id, "Thread reported");
        Ok(())
    }

    /// Replace a reply's text with the tombstone if the password matches.
    ///
    /// The reply keeps its id, timestamp, password hash and reported flag.
    pub async fn delete_reply(
        &self,
        thread_id: ThreadId,
        reply_id: ReplyId,
        secret: &str,
    ) -> Result<DeleteOutcome> {
        let thread = self.load_thread(thread_id).await?;
        let reply = thread
            .reply(reply_id)
            .ok_or_else(AnonboardError::reply_not_found)?;

        if !self.verify_secret(secret, &reply.secret_hash).await? {
            warn!(
                thread_id = %thread_id,
                reply_id = %reply_id,
                "Reply delete rejected: incorrect password"
            );
            return Ok(DeleteOutcome::IncorrectPassword);
        }

        // Replies are never removed, so a miss here means the thread went away.
        if !self.repo.tombstone_reply(thread_id, reply_id).await? {
            return Err(AnonboardError::thread_not_found());
        }

        info!(thread_id = %thread_id, reply_id = %reply_id, "Reply deleted");
        Ok(DeleteOutcome::Deleted)
    }

    /// Flag a reply for moderation.
    pub async fn report_reply(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<()> {
        let thread = self.load_thread(thread_id).await?;
        if thread.reply(reply_id).is_none() {
            return Err(AnonboardError::reply_not_found());
        }

        if !self.repo.set_reply_reported(thread_id, reply_id).await? {
            return Err(AnonboardError::thread_not_found());
        }

        info!(thread_id = %thread_id, reply_id = %reply_id, "Reply reported");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{InMemoryBoardRepository, TOMBSTONE_TEXT};
    use crate::secret::test_verifier;
    use async_trait::async_trait;

    fn setup() -> (Arc<InMemoryBoardRepository>, BoardService) {
        let repo = Arc::new(InMemoryBoardRepository::new());
        let service = BoardService::new(repo.clone(), Arc::new(test_verifier()));
        (repo, service)
    }

    fn assert_not_found(err: AnonboardError, what: &str) {
        match err {
            AnonboardError::NotFound(name) => assert_eq!(name, what),
            other => panic!("expected NotFound({what}), got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_thread_then_list() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw1").await.unwrap();

        let threads = service.list_threads("b").await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].id, id);
        assert_eq!(threads[0].text, "hello");
        assert_eq!(threads[0].created_on, threads[0].bumped_on);
        assert!(threads[0].replies.is_empty());

        let json = serde_json::to_string(&threads).unwrap();
        assert!(!json.contains("reported"));
        assert!(!json.contains("argon2"));
    }

    #[tokio::test]
    async fn test_create_thread_validation() {
        let (repo, service) = setup();

        let err = service.create_thread("b", "   ", "pw").await.unwrap_err();
        assert!(matches!(err, AnonboardError::Validation(_)));
        let err = service.create_thread(" ", "hello", "pw").await.unwrap_err();
        assert!(matches!(err, AnonboardError::Validation(_)));
        let err = service.create_thread("b", "hello", "").await.unwrap_err();
        assert!(matches!(err, AnonboardError::Validation(_)));
        let long = "x".repeat(MAX_TEXT_LENGTH + 1);
        let err = service.create_thread("b", &long, "pw").await.unwrap_err();
        assert!(matches!(err, AnonboardError::Validation(_)));

        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_board_name_is_trimmed() {
        let (_repo, service) = setup();
        service.create_thread(" b ", "hello", "pw").await.unwrap();
        assert_eq!(service.list_threads("b").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_threads_is_board_scoped() {
        let (_repo, service) = setup();
        service.create_thread("a", "on a", "pw").await.unwrap();
        service.create_thread("b", "on b", "pw").await.unwrap();

        let threads = service.list_threads("a").await.unwrap();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].board, "a");
        assert!(service.list_threads("c").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_threads_limit_and_bump_order() {
        let (_repo, service) = setup();
        let mut ids = Vec::new();
        for i in 0..12 {
            ids.push(service.create_thread("b", &format!("t{i}"), "pw").await.unwrap());
        }
        // Replying to the oldest thread brings it to the top.
        service.create_reply("b", ids[0], "bump", "pw").await.unwrap();

        let threads = service.list_threads("b").await.unwrap();
        assert_eq!(threads.len(), THREAD_LIST_LIMIT);
        assert_eq!(threads[0].id, ids[0]);
        for pair in threads.windows(2) {
            assert!(pair[0].bumped_on >= pair[1].bumped_on);
        }
    }

    #[tokio::test]
    async fn test_list_threads_previews_latest_replies() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw").await.unwrap();
        for i in 0..5 {
            service.create_reply("b", id, &format!("r{i}"), "pw").await.unwrap();
        }

        let threads = service.list_threads("b").await.unwrap();
        let texts: Vec<_> = threads[0].replies.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["r2", "r3", "r4"]);
        assert_eq!(threads[0].replycount, 5);
    }

    #[tokio::test]
    async fn test_create_reply_bumps_to_reply_time() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw1").await.unwrap();

        let view = service.create_reply("b", id, "hi", "pw2").await.unwrap();

        assert_eq!(view.id, id);
        assert_eq!(view.text, "hello");
        assert_eq!(view.replies.len(), 1);
        assert_eq!(view.replies[0].text, "hi");
        assert_eq!(view.bumped_on, view.replies[0].created_on);
        assert!(view.bumped_on >= view.created_on);

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("reported").is_none());
        assert!(json["replies"][0].get("reported").is_none());
        assert!(json["replies"][0].get("secret_hash").is_none());
    }

    #[tokio::test]
    async fn test_concurrent_replies_keep_bump_on_newest() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw").await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create_reply("b", id, &format!("r{i}"), "pw").await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let view = service.view_thread(id).await.unwrap();
        let newest = view.replies.iter().map(|r| r.created_on).max().unwrap();
        assert_eq!(view.bumped_on, newest);
        for pair in view.replies.windows(2) {
            assert!(pair[0].created_on <= pair[1].created_on);
        }
    }

    #[tokio::test]
    async fn test_create_reply_missing_thread() {
        let (_repo, service) = setup();
        let err = service
            .create_reply("b", ThreadId::new(), "hi", "pw")
            .await
            .unwrap_err();
        assert_not_found(err, "Thread");
    }

    #[tokio::test]
    async fn test_view_thread_returns_all_replies() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw").await.unwrap();
        for i in 0..5 {
            service.create_reply("b", id, &format!("r{i}"), "pw").await.unwrap();
        }

        let view = service.view_thread(id).await.unwrap();
        assert_eq!(view.replies.len(), 5);
        assert_eq!(view.replies[0].text, "r0");

        let err = service.view_thread(ThreadId::new()).await.unwrap_err();
        assert_not_found(err, "Thread");
    }

    #[tokio::test]
    async fn test_delete_thread_incorrect_password_leaves_thread() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw1").await.unwrap();
        let before = service.view_thread(id).await.unwrap();

        let outcome = service.delete_thread(id, "wrong").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::IncorrectPassword);
        assert_eq!(outcome.message(), "incorrect password");
        assert_eq!(service.view_thread(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_thread_correct_password() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw1").await.unwrap();
        service.create_reply("b", id, "hi", "pw2").await.unwrap();

        let outcome = service.delete_thread(id, "pw1").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(outcome.message(), "success");

        assert_not_found(service.view_thread(id).await.unwrap_err(), "Thread");
        assert_not_found(service.delete_thread(id, "pw1").await.unwrap_err(), "Thread");
        assert!(service.list_threads("b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_thread_is_idempotent() {
        let (repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw").await.unwrap();

        service.report_thread(id).await.unwrap();
        service.report_thread(id).await.unwrap();

        assert!(repo.find_thread_by_id(id).await.unwrap().unwrap().reported);
        assert_not_found(
            service.report_thread(ThreadId::new()).await.unwrap_err(),
            "Thread",
        );
    }

    #[tokio::test]
    async fn test_delete_reply_tombstones() {
        let (repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw1").await.unwrap();
        let view = service.create_reply("b", id, "hi", "pw2").await.unwrap();
        let reply = view.replies[0].clone();
        service.report_reply(id, reply.id).await.unwrap();

        let outcome = service.delete_reply(id, reply.id, "pw2").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);

        let after = service.view_thread(id).await.unwrap();
        assert_eq!(after.replies.len(), 1);
        assert_eq!(after.replies[0].id, reply.id);
        assert_eq!(after.replies[0].created_on, reply.created_on);
        assert_eq!(after.replies[0].text, TOMBSTONE_TEXT);

        let stored = repo.find_thread_by_id(id).await.unwrap().unwrap();
        assert!(stored.replies[0].reported);
        assert_eq!(stored.replies[0].text, TOMBSTONE_TEXT);
    }

    #[tokio::test]
    async fn test_delete_reply_incorrect_password() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw1").await.unwrap();
        let view = service.create_reply("b", id, "hi", "pw2").await.unwrap();
        let reply_id = view.replies[0].id;

        // The thread's password does not unlock the reply.
        let outcome = service.delete_reply(id, reply_id, "pw1").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::IncorrectPassword);
        assert_eq!(service.view_thread(id).await.unwrap().replies[0].text, "hi");
    }

    #[tokio::test]
    async fn test_delete_reply_not_found() {
        let (_repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw").await.unwrap();

        let err = service
            .delete_reply(id, ReplyId::new(), "pw")
            .await
            .unwrap_err();
        assert_not_found(err, "Reply");

        let err = service
            .delete_reply(ThreadId::new(), ReplyId::new(), "pw")
            .await
            .unwrap_err();
        assert_not_found(err, "Thread");
    }

    #[tokio::test]
    async fn test_report_reply() {
        let (repo, service) = setup();
        let id = service.create_thread("b", "hello", "pw").await.unwrap();
        let view = service.create_reply("b", id, "hi", "pw").await.unwrap();
        let reply_id = view.replies[0].id;

        service.report_reply(id, reply_id).await.unwrap();
        service.report_reply(id, reply_id).await.unwrap();
        let stored = repo.find_thread_by_id(id).await.unwrap().unwrap();
        assert!(stored.replies[0].reported);
        assert!(!stored.reported);

        assert_not_found(
            service.report_reply(id, ReplyId::new()).await.unwrap_err(),
            "Reply",
        );
        assert_not_found(
            service.report_reply(ThreadId::new(), reply_id).await.unwrap_err(),
            "Thread",
        );
    }

    #[tokio::test]
    async fn test_example_walkthrough() {
        let (_repo, service) = setup();
        let t1 = service.create_thread("b", "hello", "pw1").await.unwrap();
        let after_reply = service.create_reply("b", t1, "hi", "pw2").await.unwrap();
        let r1 = after_reply.replies[0].id;

        let view = service.view_thread(t1).await.unwrap();
        assert_eq!(view.id, t1);
        assert_eq!(view.text, "hello");
        assert_eq!(view.replies.len(), 1);
        assert_eq!(view.replies[0].id, r1);
        assert_eq!(view.replies[0].text, "hi");
        assert_eq!(view.bumped_on, view.replies[0].created_on);
    }

    /// Repository whose every call fails, standing in for an unreachable store.
    struct FailingRepository;

    #[async_trait]
    impl BoardRepository for FailingRepository {
        async fn create_thread(&self, _: &Thread) -> Result<ThreadId> {
            Err(AnonboardError::Database("store unavailable".to_string()))
        }
        async fn find_threads_by_board(&self, _: &str, _: usize) -> Result<Vec<Thread>> {
            Err(AnonboardError::Database("store unavailable".to_string()))
        }
        async fn find_thread_by_id(&self, _: ThreadId) -> Result<Option<Thread>> {
            Err(AnonboardError::Database("store unavailable".to_string()))
        }
        async fn append_reply(&self, _: ThreadId, _: Reply) -> Result<Option<Thread>> {
            Err(AnonboardError::Database("store unavailable".to_string()))
        }
        async fn delete_thread(&self, _: ThreadId) -> Result<bool> {
            Err(AnonboardError::Database("store unavailable".to_string()))
        }
        async fn set_thread_reported(&self, _: ThreadId) -> Result<bool> {
            Err(AnonboardError::Database("store unavailable".to_string()))
        }
        async fn set_reply_reported(&self, _: ThreadId, _: ReplyId) -> Result<bool> {
            Err(AnonboardError::Database("store unavailable".to_string()))
        }
        async fn tombstone_reply(&self, _: ThreadId, _: ReplyId) -> Result<bool> {
            Err(AnonboardError::Database("store unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let service = BoardService::new(Arc::new(FailingRepository), Arc::new(test_verifier()));

        let err = service.create_thread("b", "hello", "pw").await.unwrap_err();
        assert!(matches!(err, AnonboardError::Database(_)));
        let err = service.delete_thread(ThreadId::new(), "pw").await.unwrap_err();
        assert!(matches!(err, AnonboardError::Database(_)));
        let err = service.list_threads("b").await.unwrap_err();
        assert!(matches!(err, AnonboardError::Database(_)));
    }
}
