//! SQLite implementation of [`BoardRepository`].

use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, Transaction};

use super::id::{ReplyId, ThreadId};
use super::repository::BoardRepository;
use super::thread::{Reply, Thread, TOMBSTONE_TEXT};
use crate::datetime::{from_micros, to_micros};
use crate::db::DbPool;
use crate::secret::HashedSecret;
use crate::{AnonboardError, Result};

/// Row of the `threads` table.
#[derive(sqlx::FromRow)]
struct ThreadRow {
    id: String,
    board: String,
    text: String,
    created_on: i64,
    bumped_on: i64,
    secret_hash: String,
    reported: bool,
}

/// Row of the `replies` table.
#[derive(sqlx::FromRow)]
struct ReplyRow {
    id: String,
    text: String,
    created_on: i64,
    secret_hash: String,
    reported: bool,
}

impl ThreadRow {
    fn into_thread(self, replies: Vec<Reply>) -> Result<Thread> {
        Ok(Thread {
            id: parse_id(&self.id)?,
            board: self.board,
            text: self.text,
            created_on: from_micros(self.created_on)?,
            bumped_on: from_micros(self.bumped_on)?,
            secret_hash: HashedSecret::new(self.secret_hash),
            reported: self.reported,
            replies,
        })
    }
}

impl TryFrom<ReplyRow> for Reply {
    type Error = AnonboardError;

    fn try_from(row: ReplyRow) -> Result<Self> {
        Ok(Reply {
            id: parse_id(&row.id)?,
            text: row.text,
            created_on: from_micros(row.created_on)?,
            secret_hash: HashedSecret::new(row.secret_hash),
            reported: row.reported,
        })
    }
}

fn parse_id<T: std::str::FromStr>(raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| AnonboardError::Database(format!("malformed id in storage: {raw}")))
}

const SELECT_THREAD: &str = "SELECT id, board, text, created_on, bumped_on, secret_hash, reported
     FROM threads";

/// Repository storing threads and replies in SQLite.
///
/// Each operation runs in its own transaction, so readers never see a
/// thread whose replies and bump timestamp disagree.
pub struct SqliteBoardRepository {
    pool: DbPool,
}

impl SqliteBoardRepository {
    /// Create a new repository over the given pool.
    pub fn new(pool: &DbPool) -> Self {
        Self { pool: pool.clone() }
    }

    async fn load_replies(conn: &mut SqliteConnection, thread_id: &str) -> Result<Vec<Reply>> {
        let rows: Vec<ReplyRow> = sqlx::query_as(
            "SELECT id, text, created_on, secret_hash, reported
             FROM replies WHERE thread_id = ? ORDER BY position ASC",
        )
        .bind(thread_id)
        .fetch_all(conn)
        .await?;

        rows.into_iter().map(Reply::try_from).collect()
    }

    async fn load_thread(conn: &mut SqliteConnection, id: ThreadId) -> Result<Option<Thread>> {
        let row: Option<ThreadRow> = sqlx::query_as(&format!("{SELECT_THREAD} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => {
                let replies = Self::load_replies(conn, &row.id).await?;
                Ok(Some(row.into_thread(replies)?))
            }
            None => Ok(None),
        }
    }

    async fn insert_reply(
        tx: &mut Transaction<'static, Sqlite>,
        thread_id: &str,
        reply: &Reply,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO replies (thread_id, id, position, text, created_on, secret_hash, reported)
             VALUES (?, ?,
                     (SELECT COALESCE(MAX(position), 0) + 1 FROM replies WHERE thread_id = ?),
                     ?, ?, ?, ?)",
        )
        .bind(thread_id)
        .bind(reply.id.to_string())
        .bind(thread_id)
        .bind(&reply.text)
        .bind(to_micros(&reply.created_on))
        .bind(reply.secret_hash.as_str())
        .bind(reply.reported)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl BoardRepository for SqliteBoardRepository {
    async fn create_thread(&self, thread: &Thread) -> Result<ThreadId> {
        let id = thread.id.to_string();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO threads (id, board, text, created_on, bumped_on, secret_hash, reported)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&thread.board)
        .bind(&thread.text)
        .bind(to_micros(&thread.created_on))
        .bind(to_micros(&thread.bumped_on))
        .bind(thread.secret_hash.as_str())
        .bind(thread.reported)
        .execute(&mut *tx)
        .await?;

        for reply in &thread.replies {
            Self::insert_reply(&mut tx, &id, reply).await?;
        }

        tx.commit().await?;
        Ok(thread.id)
    }

    async fn find_threads_by_board(&self, board: &str, limit: usize) -> Result<Vec<Thread>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut tx = self.pool.begin().await?;

        let rows: Vec<ThreadRow> = sqlx::query_as(&format!(
            "{SELECT_THREAD} WHERE board = ? ORDER BY bumped_on DESC, rowid DESC LIMIT ?"
        ))
        .bind(board)
        .bind(limit)
        .fetch_all(&mut *tx)
        .await?;

        let mut threads = Vec::with_capacity(rows.len());
        for row in rows {
            let replies = Self::load_replies(&mut tx, &row.id).await?;
            threads.push(row.into_thread(replies)?);
        }

        tx.commit().await?;
        Ok(threads)
    }

    async fn find_thread_by_id(&self, id: ThreadId) -> Result<Option<Thread>> {
        let mut tx = self.pool.begin().await?;
        let thread = Self::load_thread(&mut tx, id).await?;
        tx.commit().await?;
        Ok(thread)
    }

    async fn append_reply(&self, thread_id: ThreadId, mut reply: Reply) -> Result<Option<Thread>> {
        let id = thread_id.to_string();
        let mut tx = self.pool.begin().await?;

        // A no-op write takes the database write lock before the clock is read,
        // so appends to one thread are stamped in commit order.
        let last_bump: Option<i64> = sqlx::query_scalar(
            "UPDATE threads SET bumped_on = bumped_on WHERE id = ? RETURNING bumped_on",
        )
        .bind(&id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(last_bump) = last_bump else {
            return Ok(None);
        };

        let now = crate::datetime::now().max(from_micros(last_bump)?);
        reply.created_on = now;

        sqlx::query("UPDATE threads SET bumped_on = ? WHERE id = ?")
            .bind(to_micros(&now))
            .bind(&id)
            .execute(&mut *tx)
            .await?;
        Self::insert_reply(&mut tx, &id, &reply).await?;
        let thread = Self::load_thread(&mut tx, thread_id).await?;

        tx.commit().await?;
        Ok(thread)
    }

    async fn delete_thread(&self, id: ThreadId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM threads WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_thread_reported(&self, id: ThreadId) -> Result<bool> {
        let result = sqlx::query("UPDATE threads SET reported = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_reply_reported(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<bool> {
        let result = sqlx::query("UPDATE replies SET reported = 1 WHERE thread_id = ? AND id = ?")
            .bind(thread_id.to_string())
            .bind(reply_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn tombstone_reply(&self, thread_id: ThreadId, reply_id: ReplyId) -> Result<bool> {
        let result = sqlx::query("UPDATE replies SET text = ? WHERE thread_id = ? AND id = ?")
            .bind(TOMBSTONE_TEXT)
            .bind(thread_id.to_string())
            .bind(reply_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
