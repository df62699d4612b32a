use anyhow::{Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use ripple_types::models::{Post, User};

use crate::Database;
use crate::documents;

/// Fixed-width timestamp for the indexed `created_at` column, so that
/// lexicographic ORDER BY matches chronological order.
fn ts(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &User) -> Result<()> {
        let doc = documents::encode(user)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, email, doc, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    user.id.to_string(),
                    user.email,
                    doc,
                    ts(&user.created_at)
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.with_conn(|conn| {
            let raw: Option<String> = conn
                .query_row("SELECT doc FROM users WHERE email = ?1", [email], |row| {
                    row.get(0)
                })
                .optional()?;
            raw.map(|raw| documents::decode(&raw)).transpose()
        })
    }

    pub fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    /// Whole-document replacement; the only user mutation in scope is the
    /// friend list, so email stays in sync with the indexed column.
    pub fn update_user(&self, user: &User) -> Result<()> {
        let doc = documents::encode(user)?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET doc = ?2, email = ?3 WHERE id = ?1",
                rusqlite::params![user.id.to_string(), doc, user.email],
            )?;
            if changed == 0 {
                return Err(anyhow!("user not found: {}", user.id));
            }
            Ok(())
        })
    }

    pub fn count_users(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }

    // -- Posts --

    pub fn create_post(&self, post: &Post) -> Result<()> {
        let doc = documents::encode(post)?;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (id, author_id, doc, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    post.id.to_string(),
                    post.author_id.to_string(),
                    doc,
                    ts(&post.created_at)
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_post(&self, id: &Uuid) -> Result<Option<Post>> {
        self.with_conn(|conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT doc FROM posts WHERE id = ?1",
                    [id.to_string()],
                    |row| row.get(0),
                )
                .optional()?;
            raw.map(|raw| documents::decode(&raw)).transpose()
        })
    }

    /// Whole-document replacement. No version check: concurrent like
    /// toggles on the same post are last-write-wins.
    pub fn update_post(&self, post: &Post) -> Result<()> {
        let doc = documents::encode(post)?;
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE posts SET doc = ?2 WHERE id = ?1",
                rusqlite::params![post.id.to_string(), doc],
            )?;
            if changed == 0 {
                return Err(anyhow!("post not found: {}", post.id));
            }
            Ok(())
        })
    }

    pub fn list_posts(&self) -> Result<Vec<Post>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT doc FROM posts ORDER BY created_at DESC, id")?;
            collect_posts(&mut stmt, &[])
        })
    }

    pub fn list_posts_by_author(&self, author_id: &Uuid) -> Result<Vec<Post>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT doc FROM posts WHERE author_id = ?1 ORDER BY created_at DESC, id",
            )?;
            collect_posts(&mut stmt, &[author_id.to_string()])
        })
    }
}

fn query_user_by_id(conn: &Connection, id: &Uuid) -> Result<Option<User>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT doc FROM users WHERE id = ?1",
            [id.to_string()],
            |row| row.get(0),
        )
        .optional()?;
    raw.map(|raw| documents::decode(&raw)).transpose()
}

fn collect_posts(stmt: &mut rusqlite::Statement<'_>, params: &[String]) -> Result<Vec<Post>> {
    let raws = stmt
        .query_map(rusqlite::params_from_iter(params), |row| {
            row.get::<_, String>(0)
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    raws.iter().map(|raw| documents::decode(raw)).collect()
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
