//! socialctl-core: social graph data model, repository seam and service
//!
//! People are registered with optional descriptive attributes and connected
//! by symmetric friendships. The [`SocialService`] enforces the business rules
//! and talks to storage only through the [`PersonRepository`] and
//! [`FriendshipRepository`] traits.

pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod service;

pub use config::{DatabaseConfig, SocialConfig};
pub use error::{ErrorKind, Result, SocialError};
pub use memory::MemoryStore;
pub use models::{
    ConnectedPerson, DedupeReport, DuplicateGroup, Person, PersonId, PersonInput, PersonName,
    PersonPatch, Statistics,
};
pub use repository::{FriendshipRepository, PersonRepository};
pub use service::SocialService;
