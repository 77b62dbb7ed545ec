//! Aggregate views over the whole graph

use serde::{Deserialize, Serialize};

use super::Person;

/// Person with the highest number of distinct friends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedPerson {
    pub name: String,
    pub friend_count: i64,
}

/// Network-wide statistics.
///
/// `total_relationships` counts directed edges, so one friendship counts twice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_people: i64,
    pub total_relationships: i64,
    pub unique_cities: i64,
    pub unique_hobbies: i64,
    /// Mean distinct-friend count; people with no friends contribute 0
    pub average_friends: f64,
    /// `None` only when there are no people
    pub most_connected: Option<ConnectedPerson>,
}

/// One set of people sharing a case-insensitive name
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub name: String,
    pub kept: Person,
    pub removed: Vec<Person>,
}

/// Outcome of a duplicate-name cleanup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupeReport {
    pub groups: Vec<DuplicateGroup>,
    pub dry_run: bool,
}

impl DedupeReport {
    pub fn removed_count(&self) -> usize {
        self.groups.iter().map(|g| g.removed.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.groups.is_empty()
    }
}
