//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod person;
pub mod statistics;
pub mod validation;

pub use person::{fold_name, validate_age, Person, PersonId, PersonInput, PersonName, PersonPatch};
pub use statistics::{ConnectedPerson, DedupeReport, DuplicateGroup, Statistics};
pub use validation::ValidationError;
