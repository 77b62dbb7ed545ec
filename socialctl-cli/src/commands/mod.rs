//! Non-interactive subcommands

pub mod dedupe;
pub mod setup;

pub use dedupe::{run_dedupe, DedupeArgs};
pub use setup::run_setup;
