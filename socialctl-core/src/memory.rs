//! In-memory backend implementing both repository traits.
//!
//! State lives behind a `tokio::sync::RwLock`. Friendships are stored as
//! directed edges exactly like the SQL backend, so statistics and cascade
//! behaviour match.

use std::collections::{BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::{fold_name, ConnectedPerson, Person, PersonId, PersonPatch, Statistics};
use crate::repository::{FriendshipRepository, PersonRepository};
use crate::{Result, SocialError};

#[derive(Default)]
struct MemoryState {
    people: HashMap<PersonId, Person>,
    /// Directed edges (from, to)
    edges: BTreeSet<(PersonId, PersonId)>,
}

impl MemoryState {
    fn neighbours(&self, id: &PersonId) -> HashSet<&PersonId> {
        self.edges
            .iter()
            .filter_map(|(from, to)| {
                if from == id {
                    Some(to)
                } else if to == id {
                    Some(from)
                } else {
                    None
                }
            })
            .collect()
    }

    fn recommendations<F>(&self, id: &PersonId, matches: F) -> Vec<Person>
    where
        F: Fn(&Person) -> bool,
    {
        if !self.people.contains_key(id) {
            return Vec::new();
        }
        let friends = self.neighbours(id);
        let found = self
            .people
            .values()
            .filter(|p| &p.id != id && !friends.contains(&p.id) && matches(p))
            .cloned()
            .collect();
        sorted_by_name(found)
    }
}

/// In-process social graph store
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record as-is, bypassing upsert rules.
    ///
    /// Lets callers reproduce legacy data (e.g. duplicate names) that the
    /// service would refuse to create.
    pub async fn seed(&self, person: Person) {
        let mut state = self.state.write().await;
        state.people.insert(person.id.clone(), person);
    }

    /// Number of directed edges currently stored.
    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }
}

fn sorted_by_name(mut people: Vec<Person>) -> Vec<Person> {
    people.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    people
}

fn contains_folded(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|value| fold_name(value).contains(needle))
}

#[async_trait]
impl PersonRepository for MemoryStore {
    async fn create_or_update(&self, id: &PersonId, patch: &PersonPatch) -> Result<Person> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.people.get_mut(id) {
            existing.apply(patch);
            debug!(person_id = %id, "updated person");
            return Ok(existing.clone());
        }

        let name = patch
            .name
            .as_ref()
            .ok_or_else(|| SocialError::invalid("name is required when creating a person"))?;

        let person = Person {
            id: id.clone(),
            name: name.as_str().to_owned(),
            city: patch.city.clone(),
            age: patch.age,
            hobby: patch.hobby.clone(),
            created_at: Utc::now(),
        };
        state.people.insert(id.clone(), person.clone());
        debug!(person_id = %id, "created person");
        Ok(person)
    }

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>> {
        Ok(self.state.read().await.people.get(id).cloned())
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Person>> {
        let state = self.state.read().await;
        let people: Vec<Person> = match filter {
            None => state.people.values().cloned().collect(),
            Some(q) => {
                let needle = fold_name(q);
                state
                    .people
                    .values()
                    .filter(|p| {
                        contains_folded(Some(p.name.as_str()), &needle)
                            || contains_folded(p.city.as_deref(), &needle)
                            || contains_folded(p.hobby.as_deref(), &needle)
                    })
                    .cloned()
                    .collect()
            }
        };
        Ok(sorted_by_name(people))
    }

    async fn delete_by_id(&self, id: &PersonId) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.people.remove(id).is_none() {
            return Ok(false);
        }
        state.edges.retain(|(from, to)| from != id && to != id);
        debug!(person_id = %id, "deleted person and incident friendships");
        Ok(true)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Person>> {
        let folded = fold_name(name);
        let state = self.state.read().await;
        Ok(state
            .people
            .values()
            .filter(|p| fold_name(&p.name) == folded)
            .min_by(|a, b| a.id.cmp(&b.id))
            .cloned())
    }

    async fn friends_of(&self, id: &PersonId) -> Result<Vec<Person>> {
        let state = self.state.read().await;
        let friends = state
            .neighbours(id)
            .into_iter()
            .filter_map(|fid| state.people.get(fid).cloned())
            .collect();
        Ok(sorted_by_name(friends))
    }

    async fn city_recommendations(&self, id: &PersonId, city: &str) -> Result<Vec<Person>> {
        let state = self.state.read().await;
        Ok(state.recommendations(id, |p| p.city.as_deref() == Some(city)))
    }

    async fn hobby_recommendations(&self, id: &PersonId, hobby: &str) -> Result<Vec<Person>> {
        let state = self.state.read().await;
        Ok(state.recommendations(id, |p| p.hobby.as_deref() == Some(hobby)))
    }

    async fn statistics(&self) -> Result<Statistics> {
        let state = self.state.read().await;

        let total_people = state.people.len() as i64;
        let unique_cities = state
            .people
            .values()
            .filter_map(|p| p.city.as_deref())
            .collect::<HashSet<_>>()
            .len() as i64;
        let unique_hobbies = state
            .people
            .values()
            .filter_map(|p| p.hobby.as_deref())
            .collect::<HashSet<_>>()
            .len() as i64;

        let mut degrees: Vec<(&Person, i64)> = state
            .people
            .values()
            .map(|p| (p, state.neighbours(&p.id).len() as i64))
            .collect();
        degrees.sort_by(|(a, da), (b, db)| {
            db.cmp(da)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.id.cmp(&b.id))
        });

        let average_friends = if degrees.is_empty() {
            0.0
        } else {
            degrees.iter().map(|(_, d)| *d as f64).sum::<f64>() / degrees.len() as f64
        };

        Ok(Statistics {
            total_people,
            total_relationships: state.edges.len() as i64,
            unique_cities,
            unique_hobbies,
            average_friends,
            most_connected: degrees.first().map(|(p, d)| ConnectedPerson {
                name: p.name.clone(),
                friend_count: *d,
            }),
        })
    }
}

#[async_trait]
impl FriendshipRepository for MemoryStore {
    async fn add(&self, from: &PersonId, to: &PersonId) -> Result<()> {
        let mut state = self.state.write().await;
        for id in [from, to] {
            if !state.people.contains_key(id) {
                return Err(SocialError::person_not_found(id.as_str()));
            }
        }
        if from == to {
            return Err(SocialError::invalid("a person cannot befriend themselves"));
        }

        state.edges.insert((from.clone(), to.clone()));
        state.edges.insert((to.clone(), from.clone()));
        info!(%from, %to, "friendship created");
        Ok(())
    }

    async fn remove(&self, from: &PersonId, to: &PersonId) -> Result<bool> {
        let mut state = self.state.write().await;
        let forward = state.edges.remove(&(from.clone(), to.clone()));
        let backward = state.edges.remove(&(to.clone(), from.clone()));

        if forward || backward {
            info!(%from, %to, "friendship removed");
            Ok(true)
        } else {
            info!(%from, %to, "no friendship to remove");
            Ok(false)
        }
    }
}
