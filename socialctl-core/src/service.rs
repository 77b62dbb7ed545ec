//! Social service - business rules over the repositories
//!
//! Responsibilities the repositories deliberately do not have:
//! - case-insensitive name uniqueness on registration
//! - rejecting self-friendship before anything reaches the store
//! - resolving names to ids for the name-based operations
//! - choosing the match attribute for recommendations

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{
    fold_name, validate_age, DedupeReport, DuplicateGroup, Person, PersonId, PersonInput,
    PersonName, PersonPatch, Statistics,
};
use crate::repository::{FriendshipRepository, PersonRepository};
use crate::{Result, SocialError};

/// Orchestrates person and friendship repositories
#[derive(Clone)]
pub struct SocialService {
    people: Arc<dyn PersonRepository>,
    friendships: Arc<dyn FriendshipRepository>,
}

impl SocialService {
    pub fn new(
        people: Arc<dyn PersonRepository>,
        friendships: Arc<dyn FriendshipRepository>,
    ) -> Self {
        Self {
            people,
            friendships,
        }
    }

    /// Register (or re-register) a person.
    ///
    /// Generates an id when none is supplied. Fails with `Conflict` when a
    /// different person already uses the same name, ignoring case.
    pub async fn register_person(&self, input: PersonInput) -> Result<Person> {
        let name = PersonName::new(&input.name)?;
        let age = input.age.map(validate_age).transpose()?;
        let id = match input.id.as_deref() {
            Some(raw) => PersonId::new(raw)?,
            None => PersonId::generate(),
        };

        if let Some(existing) = self.people.find_by_name(name.as_str()).await? {
            if existing.id != id {
                return Err(SocialError::conflict(format!(
                    "a person named '{}' already exists (id {})",
                    existing.name, existing.id
                )));
            }
        }

        let patch = PersonPatch::new()
            .name(name)
            .city(input.city.as_deref())
            .age(age)
            .hobby(input.hobby.as_deref());

        let person = self.people.create_or_update(&id, &patch).await?;
        info!(person_id = %person.id, name = %person.name, "person registered");
        Ok(person)
    }

    /// List everyone, or filter by a substring of name, city or hobby.
    pub async fn list_people(&self, filter: Option<&str>) -> Result<Vec<Person>> {
        let filter = filter.map(str::trim).filter(|q| !q.is_empty());
        self.people.list(filter).await
    }

    pub async fn find_person(&self, id: &PersonId) -> Result<Option<Person>> {
        self.people.find_by_id(id).await
    }

    /// Delete a person and their friendships. `NotFound` if the id is unknown.
    pub async fn delete_person(&self, id: &PersonId) -> Result<()> {
        if !self.people.delete_by_id(id).await? {
            return Err(SocialError::person_not_found(id.as_str()));
        }
        info!(person_id = %id, "person deleted");
        Ok(())
    }

    pub async fn delete_person_by_name(&self, name: &str) -> Result<Person> {
        let person = self.resolve(name).await?;
        self.delete_person(&person.id).await?;
        Ok(person)
    }

    pub async fn add_friend(&self, from: &PersonId, to: &PersonId) -> Result<()> {
        reject_self(from, to)?;
        self.friendships.add(from, to).await
    }

    /// Returns `false` when the two were not friends; that is not an error.
    pub async fn remove_friend(&self, from: &PersonId, to: &PersonId) -> Result<bool> {
        reject_self(from, to)?;
        self.friendships.remove(from, to).await
    }

    pub async fn add_friend_by_name(&self, from: &str, to: &str) -> Result<(Person, Person)> {
        let (a, b) = self.resolve_pair(from, to).await?;
        self.add_friend(&a.id, &b.id).await?;
        Ok((a, b))
    }

    pub async fn remove_friend_by_name(&self, from: &str, to: &str) -> Result<bool> {
        let (a, b) = self.resolve_pair(from, to).await?;
        self.remove_friend(&a.id, &b.id).await
    }

    pub async fn list_friends(&self, id: &PersonId) -> Result<Vec<Person>> {
        if self.people.find_by_id(id).await?.is_none() {
            return Err(SocialError::person_not_found(id.as_str()));
        }
        self.people.friends_of(id).await
    }

    pub async fn list_friends_by_name(&self, name: &str) -> Result<Vec<Person>> {
        let person = self.resolve(name).await?;
        self.people.friends_of(&person.id).await
    }

    /// People in the named person's city who are not yet their friends.
    pub async fn city_recommendations(&self, name: &str) -> Result<Vec<Person>> {
        let person = self.resolve(name).await?;
        match person.city.as_deref() {
            Some(city) => self.people.city_recommendations(&person.id, city).await,
            None => {
                debug!(person_id = %person.id, "no city on record, nothing to recommend");
                Ok(Vec::new())
            }
        }
    }

    /// People sharing the named person's hobby who are not yet their friends.
    pub async fn hobby_recommendations(&self, name: &str) -> Result<Vec<Person>> {
        let person = self.resolve(name).await?;
        match person.hobby.as_deref() {
            Some(hobby) => self.people.hobby_recommendations(&person.id, hobby).await,
            None => {
                debug!(person_id = %person.id, "no hobby on record, nothing to recommend");
                Ok(Vec::new())
            }
        }
    }

    pub async fn statistics(&self) -> Result<Statistics> {
        self.people.statistics().await
    }

    /// Collapse people whose names differ only by case.
    ///
    /// The earliest-created record of each group survives (ties: lowest id);
    /// the others are deleted along with their friendships unless `dry_run`.
    pub async fn dedupe_names(&self, dry_run: bool) -> Result<DedupeReport> {
        let mut by_name: BTreeMap<String, Vec<Person>> = BTreeMap::new();
        for person in self.people.list(None).await? {
            by_name
                .entry(fold_name(&person.name))
                .or_default()
                .push(person);
        }

        let mut groups = Vec::new();
        for (_, mut people) in by_name.into_iter().filter(|(_, p)| p.len() > 1) {
            people.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.id.cmp(&b.id))
            });
            let kept = people.remove(0);
            warn!(
                name = %kept.name,
                duplicates = people.len(),
                "duplicate name found"
            );

            if !dry_run {
                for dup in &people {
                    self.people.delete_by_id(&dup.id).await?;
                    info!(person_id = %dup.id, kept = %kept.id, "duplicate removed");
                }
            }

            groups.push(DuplicateGroup {
                name: kept.name.clone(),
                kept,
                removed: people,
            });
        }

        Ok(DedupeReport { groups, dry_run })
    }

    async fn resolve(&self, name: &str) -> Result<Person> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SocialError::invalid("name cannot be empty"));
        }
        self.people
            .find_by_name(name)
            .await?
            .ok_or_else(|| SocialError::name_not_found(name))
    }

    async fn resolve_pair(&self, from: &str, to: &str) -> Result<(Person, Person)> {
        let a = self.resolve(from).await?;
        let b = self.resolve(to).await?;
        Ok((a, b))
    }
}

fn reject_self(from: &PersonId, to: &PersonId) -> Result<()> {
    if from == to {
        return Err(SocialError::invalid(format!(
            "person {} cannot be their own friend",
            from
        )));
    }
    Ok(())
}
