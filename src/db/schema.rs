//! Database schema and migrations for anonboard.
//!
//! Migrations are applied in order when a database is opened. The
//! `schema_version` table records which ones have already run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: threads and their embedded replies
    r#"
CREATE TABLE threads (
    id           TEXT PRIMARY KEY,        -- UUID
    board        TEXT NOT NULL,
    text         TEXT NOT NULL,
    created_on   INTEGER NOT NULL,        -- microseconds since epoch
    bumped_on    INTEGER NOT NULL,        -- microseconds since epoch
    secret_hash  TEXT NOT NULL,           -- Argon2 hash
    reported     INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_threads_board_bumped ON threads(board, bumped_on DESC);

CREATE TABLE replies (
    thread_id    TEXT NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
    id           TEXT NOT NULL,           -- UUID, unique within the thread
    position     INTEGER NOT NULL,        -- 1-based insertion order
    text         TEXT NOT NULL,
    created_on   INTEGER NOT NULL,
    secret_hash  TEXT NOT NULL,
    reported     INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (thread_id, id),
    UNIQUE (thread_id, position)
);
"#,
];
