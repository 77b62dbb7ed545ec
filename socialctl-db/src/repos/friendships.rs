//! Friendship repository
//!
//! A friendship is two directed rows. Both are written or removed in one
//! session so a half-friendship is never visible.

use async_trait::async_trait;
use socialctl_core::{FriendshipRepository, PersonId, Result, SocialError};
use tracing::info;

use crate::connection::{AccessMode, Database};
use crate::error::SqlxResultExt;

/// PostgreSQL-backed [`FriendshipRepository`]
#[derive(Clone)]
pub struct PgFriendshipRepo {
    db: Database,
}

impl PgFriendshipRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FriendshipRepository for PgFriendshipRepo {
    async fn add(&self, from: &PersonId, to: &PersonId) -> Result<()> {
        let mut session = self.db.acquire(AccessMode::Write).await?;

        // Lock both endpoints so a concurrent delete cannot slip in between
        let found: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM people WHERE id = $1 OR id = $2 FOR SHARE")
                .bind(from.as_str())
                .bind(to.as_str())
                .fetch_all(session.conn())
                .await
                .ctx("checking friendship endpoints")?;

        for id in [from, to] {
            if !found.iter().any(|(found_id,)| found_id == id.as_str()) {
                return Err(SocialError::person_not_found(id.as_str()));
            }
        }
        if from == to {
            return Err(SocialError::invalid("a person cannot befriend themselves"));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO friendships (from_id, to_id)
            VALUES ($1, $2), ($2, $1)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(session.conn())
        .await
        .ctx("adding friendship")?;

        session.close().await?;
        info!(
            from = %from,
            to = %to,
            new_edges = result.rows_affected(),
            "friendship added"
        );
        Ok(())
    }

    async fn remove(&self, from: &PersonId, to: &PersonId) -> Result<bool> {
        let mut session = self.db.acquire(AccessMode::Write).await?;
        let result = sqlx::query(
            r#"
            DELETE FROM friendships
            WHERE (from_id = $1 AND to_id = $2)
               OR (from_id = $2 AND to_id = $1)
            "#,
        )
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(session.conn())
        .await
        .ctx("removing friendship")?;
        session.close().await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(from = %from, to = %to, "friendship removed");
        } else {
            info!(from = %from, to = %to, "no friendship to remove");
        }
        Ok(removed)
    }
}
