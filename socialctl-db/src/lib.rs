//! socialctl-db: PostgreSQL backend for the social graph
//!
//! # Design Principles
//!
//! - One lazily created pool per process, shared by cloning [`Database`]
//! - Short-lived sessions: read-only or read-write, rolled back unless closed
//! - Rely on DB constraints and map SQLSTATE codes to typed errors

pub mod connection;
pub mod error;
pub mod repos;
pub mod schema;

pub use connection::{create_pool, AccessMode, Database, ScopedSession};
pub use repos::{PgFriendshipRepo, PgPersonRepo};
pub use schema::{ensure_constraints, ensure_tables};
