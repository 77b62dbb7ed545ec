//! Person entity and its validated building blocks

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::non_blank;
use super::ValidationError;

/// Maximum length for person names, in characters
const MAX_NAME_LEN: usize = 200;

/// Opaque person identifier (primary key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Wrap an externally supplied id. Surrounding whitespace is dropped.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "person id" });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Fresh random id (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PersonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated display name.
///
/// Names compare case-insensitively everywhere a lookup happens, see
/// [`PersonName::folded`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName(String);

impl PersonName {
    /// Create a new name.
    ///
    /// # Rules
    /// - Leading/trailing whitespace is trimmed
    /// - Must not be empty after trimming
    /// - Max 200 characters
    ///
    /// # Example
    /// ```
    /// use socialctl_core::models::PersonName;
    ///
    /// assert_eq!(PersonName::new("  Alice ").unwrap().as_str(), "Alice");
    /// assert!(PersonName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used for case-insensitive matching.
    pub fn folded(&self) -> String {
        fold_name(&self.0)
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Case folding shared by every backend (mirrors SQL `lower()`).
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Ages are optional but never negative.
pub fn validate_age(age: i32) -> Result<i32, ValidationError> {
    if age < 0 {
        return Err(ValidationError::OutOfRange {
            field: "age",
            reason: "must not be negative",
        });
    }
    Ok(age)
}

/// Stored person record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub city: Option<String>,
    pub age: Option<i32>,
    pub hobby: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Person {
    /// Apply a patch in place. Absent patch fields leave the record untouched.
    pub fn apply(&mut self, patch: &PersonPatch) {
        if let Some(name) = &patch.name {
            self.name = name.as_str().to_owned();
        }
        if let Some(city) = &patch.city {
            self.city = Some(city.clone());
        }
        if let Some(age) = patch.age {
            self.age = Some(age);
        }
        if let Some(hobby) = &patch.hobby {
            self.hobby = Some(hobby.clone());
        }
    }
}

/// Partial update for [`Person`]. `None` means "leave unchanged", never "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonPatch {
    pub name: Option<PersonName>,
    pub city: Option<String>,
    pub age: Option<i32>,
    pub hobby: Option<String>,
}

impl PersonPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: PersonName) -> Self {
        self.name = Some(name);
        self
    }

    /// Blank strings are treated as not supplied.
    pub fn city(mut self, city: Option<&str>) -> Self {
        self.city = non_blank(city);
        self
    }

    pub fn age(mut self, age: Option<i32>) -> Self {
        self.age = age;
        self
    }

    /// Blank strings are treated as not supplied.
    pub fn hobby(mut self, hobby: Option<&str>) -> Self {
        self.hobby = non_blank(hobby);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.city.is_none() && self.age.is_none() && self.hobby.is_none()
    }
}

/// Raw registration request, validated by the service
#[derive(Debug, Clone, Default)]
pub struct PersonInput {
    /// Explicit id; a UUID is generated when absent
    pub id: Option<String>,
    pub name: String,
    pub city: Option<String>,
    pub age: Option<i32>,
    pub hobby: Option<String>,
}

impl PersonInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_hobby(mut self, hobby: impl Into<String>) -> Self {
        self.hobby = Some(hobby.into());
        self
    }
}
