use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Each collection table stores one JSON document per row in `doc`,
/// alongside the columns the store indexes on. The document itself is
/// versioned and validated in `documents`.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            doc         TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS posts (
            id          TEXT PRIMARY KEY,
            author_id   TEXT NOT NULL REFERENCES users(id),
            doc         TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_posts_author
            ON posts(author_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
