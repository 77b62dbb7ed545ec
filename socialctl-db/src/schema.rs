//! Schema setup for the social graph tables
//!
//! Idempotent: every statement is `IF NOT EXISTS`, so both functions are safe
//! to run at every startup.

use socialctl_core::{ErrorKind, Result, SocialError};
use tracing::{info, warn};

use crate::connection::{AccessMode, Database};
use crate::error::SqlxResultExt;

/// Create `people` and `friendships` if missing.
///
/// Friendships are stored as directed edges; each friendship is two rows.
/// Deleting a person cascades to every edge touching them.
pub async fn ensure_tables(db: &Database) -> Result<()> {
    info!("ensuring social graph tables");
    let mut session = db.acquire(AccessMode::Write).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS people (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            city TEXT,
            age INTEGER CHECK (age IS NULL OR age >= 0),
            hobby TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(session.conn())
    .await
    .ctx("creating people table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS friendships (
            from_id TEXT NOT NULL REFERENCES people(id) ON DELETE CASCADE,
            to_id TEXT NOT NULL REFERENCES people(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (from_id, to_id),
            CHECK (from_id <> to_id)
        )
        "#,
    )
    .execute(session.conn())
    .await
    .ctx("creating friendships table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_friendships_to ON friendships (to_id)")
        .execute(session.conn())
        .await
        .ctx("creating friendships index")?;

    session.close().await
}

/// Enforce case-insensitive unique names and index the lookup columns.
///
/// Fails with `Conflict` when existing rows already share a name; run
/// `socialctl dedupe` first in that case.
pub async fn ensure_constraints(db: &Database) -> Result<()> {
    info!("ensuring social graph constraints");
    let mut session = db.acquire(AccessMode::Write).await?;

    let unique = sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS people_name_lower_unique ON people (lower(name))",
    )
    .execute(session.conn())
    .await
    .ctx("creating unique name index");

    if let Err(err) = unique {
        if err.kind() == ErrorKind::Conflict {
            warn!("duplicate names block the unique index");
            return Err(SocialError::conflict(
                "people share a name (case-insensitive); run `socialctl dedupe` first",
            ));
        }
        return Err(err);
    }

    for (sql, what) in [
        (
            "CREATE INDEX IF NOT EXISTS idx_people_city ON people (city)",
            "creating city index",
        ),
        (
            "CREATE INDEX IF NOT EXISTS idx_people_hobby ON people (hobby)",
            "creating hobby index",
        ),
    ] {
        sqlx::query(sql).execute(session.conn()).await.ctx(what)?;
    }

    session.close().await
}
