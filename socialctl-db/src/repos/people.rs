//! Person repository
//!
//! - create_or_update: INSERT .. ON CONFLICT (id) when a name is given,
//!   otherwise a COALESCE UPDATE of an existing row
//! - list / friends / recommendations: single queries, no N+1
//! - statistics: one CTE over the edge table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use socialctl_core::{
    ConnectedPerson, Person, PersonId, PersonPatch, PersonRepository, Result, SocialError,
    Statistics,
};
use sqlx::{FromRow, Postgres, Row};
use tracing::debug;

use crate::connection::{AccessMode, Database};
use crate::error::SqlxResultExt;

/// Row shape shared by every query returning people
#[derive(Debug, FromRow)]
struct PersonRow {
    id: String,
    name: String,
    city: Option<String>,
    age: Option<i32>,
    hobby: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<PersonRow> for Person {
    type Error = SocialError;

    fn try_from(row: PersonRow) -> Result<Self> {
        Ok(Person {
            id: PersonId::new(&row.id)?,
            name: row.name,
            city: row.city,
            age: row.age,
            hobby: row.hobby,
            created_at: row.created_at,
        })
    }
}

fn into_people(rows: Vec<PersonRow>) -> Result<Vec<Person>> {
    rows.into_iter().map(Person::try_from).collect()
}

const COLUMNS: &str = "p.id, p.name, p.city, p.age, p.hobby, p.created_at";

// Sorting by byte order keeps listings identical to the in-memory backend
const ORDER: &str = r#"ORDER BY p.name COLLATE "C", p.id COLLATE "C""#;

const NOT_SELF_OR_FRIEND: &str = r#"
    p.id <> $1
    AND EXISTS (SELECT 1 FROM people s WHERE s.id = $1)
    AND NOT EXISTS (
        SELECT 1 FROM friendships f
        WHERE (f.from_id = $1 AND f.to_id = p.id)
           OR (f.to_id = $1 AND f.from_id = p.id)
    )
"#;

/// PostgreSQL-backed [`PersonRepository`]
#[derive(Clone)]
pub struct PgPersonRepo {
    db: Database,
}

impl PgPersonRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn fetch_people(
        &self,
        sql: &str,
        binds: &[&str],
        context: &str,
    ) -> Result<Vec<Person>> {
        let mut session = self.db.acquire(AccessMode::Read).await?;
        let mut query = sqlx::query_as::<Postgres, PersonRow>(sql);
        for value in binds {
            query = query.bind(*value);
        }
        let rows = query.fetch_all(session.conn()).await.ctx(context)?;
        session.close().await?;
        into_people(rows)
    }

    async fn recommendations(
        &self,
        id: &PersonId,
        column: &str,
        value: &str,
        context: &str,
    ) -> Result<Vec<Person>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM people p WHERE p.{column} = $2 AND {NOT_SELF_OR_FRIEND} {ORDER}"
        );
        self.fetch_people(&sql, &[id.as_str(), value], context).await
    }
}

#[async_trait]
impl PersonRepository for PgPersonRepo {
    async fn create_or_update(&self, id: &PersonId, patch: &PersonPatch) -> Result<Person> {
        let mut session = self.db.acquire(AccessMode::Write).await?;

        let row = match patch.name.as_ref() {
            // Single statement, so concurrent first-time upserts merge
            Some(name) => sqlx::query_as::<Postgres, PersonRow>(
                r#"
                INSERT INTO people AS p (id, name, city, age, hobby)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO UPDATE SET
                    name = EXCLUDED.name,
                    city = COALESCE(EXCLUDED.city, p.city),
                    age = COALESCE(EXCLUDED.age, p.age),
                    hobby = COALESCE(EXCLUDED.hobby, p.hobby)
                RETURNING p.id, p.name, p.city, p.age, p.hobby, p.created_at
                "#,
            )
            .bind(id.as_str())
            .bind(name.as_str())
            .bind(patch.city.as_deref())
            .bind(patch.age)
            .bind(patch.hobby.as_deref())
            .fetch_one(session.conn())
            .await
            .ctx("upserting person")?,

            None => sqlx::query_as::<Postgres, PersonRow>(
                r#"
                UPDATE people p SET
                    city = COALESCE($2, p.city),
                    age = COALESCE($3, p.age),
                    hobby = COALESCE($4, p.hobby)
                WHERE p.id = $1
                RETURNING p.id, p.name, p.city, p.age, p.hobby, p.created_at
                "#,
            )
            .bind(id.as_str())
            .bind(patch.city.as_deref())
            .bind(patch.age)
            .bind(patch.hobby.as_deref())
            .fetch_optional(session.conn())
            .await
            .ctx("updating person")?
            .ok_or_else(|| SocialError::invalid("name is required when creating a person"))?,
        };

        session.close().await?;
        debug!(person_id = %id, "upserted person");
        Person::try_from(row)
    }

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>> {
        let mut session = self.db.acquire(AccessMode::Read).await?;
        let row = sqlx::query_as::<Postgres, PersonRow>(&format!(
            "SELECT {COLUMNS} FROM people p WHERE p.id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(session.conn())
        .await
        .ctx("finding person")?;
        session.close().await?;
        row.map(Person::try_from).transpose()
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Person>> {
        let mut session = self.db.acquire(AccessMode::Read).await?;
        let rows = sqlx::query_as::<Postgres, PersonRow>(&format!(
            r#"
            SELECT {COLUMNS} FROM people p
            WHERE $1::TEXT IS NULL
               OR strpos(lower(p.name), lower($1)) > 0
               OR strpos(lower(coalesce(p.city, '')), lower($1)) > 0
               OR strpos(lower(coalesce(p.hobby, '')), lower($1)) > 0
            {ORDER}
            "#
        ))
        .bind(filter)
        .fetch_all(session.conn())
        .await
        .ctx("listing people")?;
        session.close().await?;
        into_people(rows)
    }

    async fn delete_by_id(&self, id: &PersonId) -> Result<bool> {
        let mut session = self.db.acquire(AccessMode::Write).await?;
        // Friendship rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id.as_str())
            .execute(session.conn())
            .await
            .ctx("deleting person")?;
        session.close().await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            debug!(person_id = %id, "deleted person and incident friendships");
        }
        Ok(deleted)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Person>> {
        let mut session = self.db.acquire(AccessMode::Read).await?;
        let row = sqlx::query_as::<Postgres, PersonRow>(&format!(
            r#"SELECT {COLUMNS} FROM people p WHERE lower(p.name) = lower($1) ORDER BY p.id COLLATE "C" LIMIT 1"#
        ))
        .bind(name)
        .fetch_optional(session.conn())
        .await
        .ctx("finding person by name")?;
        session.close().await?;
        row.map(Person::try_from).transpose()
    }

    async fn friends_of(&self, id: &PersonId) -> Result<Vec<Person>> {
        let sql = format!(
            r#"
            SELECT {COLUMNS} FROM people p
            WHERE EXISTS (
                SELECT 1 FROM friendships f
                WHERE (f.from_id = $1 AND f.to_id = p.id)
                   OR (f.to_id = $1 AND f.from_id = p.id)
            )
            {ORDER}
            "#
        );
        self.fetch_people(&sql, &[id.as_str()], "listing friends")
            .await
    }

    async fn city_recommendations(&self, id: &PersonId, city: &str) -> Result<Vec<Person>> {
        self.recommendations(id, "city", city, "recommending by city")
            .await
    }

    async fn hobby_recommendations(&self, id: &PersonId, hobby: &str) -> Result<Vec<Person>> {
        self.recommendations(id, "hobby", hobby, "recommending by hobby")
            .await
    }

    async fn statistics(&self) -> Result<Statistics> {
        let mut session = self.db.acquire(AccessMode::Read).await?;
        let row = sqlx::query(
            r#"
            WITH pairs AS (
                SELECT from_id AS person_id, to_id AS friend_id FROM friendships
                UNION
                SELECT to_id, from_id FROM friendships
            ),
            degrees AS (
                SELECT p.name, p.id, COUNT(pr.friend_id) AS friend_count
                FROM people p
                LEFT JOIN pairs pr ON pr.person_id = p.id
                GROUP BY p.id, p.name
            ),
            top AS (
                SELECT name, friend_count FROM degrees
                ORDER BY friend_count DESC, name COLLATE "C" ASC, id ASC
                LIMIT 1
            )
            SELECT
                (SELECT COUNT(*) FROM people) AS total_people,
                (SELECT COUNT(*) FROM friendships) AS total_relationships,
                (SELECT COUNT(DISTINCT city) FROM people) AS unique_cities,
                (SELECT COUNT(DISTINCT hobby) FROM people) AS unique_hobbies,
                (SELECT COALESCE(AVG(friend_count)::DOUBLE PRECISION, 0) FROM degrees)
                    AS average_friends,
                (SELECT name FROM top) AS top_name,
                (SELECT friend_count FROM top) AS top_count
            "#,
        )
        .fetch_one(session.conn())
        .await
        .ctx("computing statistics")?;
        session.close().await?;

        let top_name: Option<String> = row.try_get("top_name").ctx("reading statistics")?;
        let top_count: Option<i64> = row.try_get("top_count").ctx("reading statistics")?;
        let most_connected = top_name.map(|name| ConnectedPerson {
            name,
            friend_count: top_count.unwrap_or(0),
        });

        Ok(Statistics {
            total_people: row.try_get("total_people").ctx("reading statistics")?,
            total_relationships: row.try_get("total_relationships").ctx("reading statistics")?,
            unique_cities: row.try_get("unique_cities").ctx("reading statistics")?,
            unique_hobbies: row.try_get("unique_hobbies").ctx("reading statistics")?,
            average_friends: row.try_get("average_friends").ctx("reading statistics")?,
            most_connected,
        })
    }
}
