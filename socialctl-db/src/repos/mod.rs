//! Repository implementations for PostgreSQL
//!
//! Each repository follows these patterns:
//! - One session (transaction) per call, committed on success
//! - Lists use a single query (no N+1)
//! - Duplicate edges are absorbed by ON CONFLICT (no check-then-insert)

pub mod friendships;
pub mod people;

pub use friendships::PgFriendshipRepo;
pub use people::PgPersonRepo;
