//! Repository traits
//!
//! The persistence seam between [`SocialService`](crate::SocialService) and a
//! backing store. Implementations own the mechanics (queries, sessions, row
//! mapping) and only enforce referential existence; business rules such as
//! name uniqueness and self-friendship live in the service.
//!
//! Backends in this workspace:
//! - `socialctl_db::PgPersonRepo` / `socialctl_db::PgFriendshipRepo` (PostgreSQL)
//! - [`MemoryStore`](crate::MemoryStore) (in-process, for tests and `--ephemeral`)

use async_trait::async_trait;

use crate::models::{Person, PersonId, PersonPatch, Statistics};
use crate::Result;

#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Upsert by id with patch semantics.
    ///
    /// Creating a person requires `patch.name`; otherwise
    /// [`SocialError::InvalidArgument`](crate::SocialError::InvalidArgument).
    async fn create_or_update(&self, id: &PersonId, patch: &PersonPatch) -> Result<Person>;

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>>;

    /// All people, or those whose name, city or hobby contains `filter`
    /// (case-insensitive). Ordered by name.
    async fn list(&self, filter: Option<&str>) -> Result<Vec<Person>>;

    /// Delete a person and every friendship touching them.
    /// Returns `false` when no such person existed.
    async fn delete_by_id(&self, id: &PersonId) -> Result<bool>;

    /// Case-insensitive exact name match, at most one record.
    async fn find_by_name(&self, name: &str) -> Result<Option<Person>>;

    /// Distinct friends in either direction, ordered by name.
    async fn friends_of(&self, id: &PersonId) -> Result<Vec<Person>>;

    /// People in `city`, excluding `id` itself and its current friends.
    async fn city_recommendations(&self, id: &PersonId, city: &str) -> Result<Vec<Person>>;

    /// People with `hobby`, excluding `id` itself and its current friends.
    async fn hobby_recommendations(&self, id: &PersonId, hobby: &str) -> Result<Vec<Person>>;

    async fn statistics(&self) -> Result<Statistics>;
}

#[async_trait]
pub trait FriendshipRepository: Send + Sync {
    /// Ensure both directed edges exist. Fails with `NotFound` when either
    /// endpoint is missing; repeated calls are no-ops.
    async fn add(&self, from: &PersonId, to: &PersonId) -> Result<()>;

    /// Remove both directed edges. Returns `false` when there was nothing to
    /// remove.
    async fn remove(&self, from: &PersonId, to: &PersonId) -> Result<bool>;
}
