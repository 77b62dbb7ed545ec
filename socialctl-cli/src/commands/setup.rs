//! `socialctl setup` - create tables, constraints and indexes

use anyhow::{Context, Result};
use socialctl_db::{ensure_constraints, Database};

use crate::ui;

/// Tables are already ensured at startup; this adds the constraints.
pub async fn run_setup(db: &Database) -> Result<()> {
    ui::with_spinner_async(
        "Creating constraints and indexes",
        "Constraints and indexes ready",
        ensure_constraints(db),
    )
    .await
    .context("Schema setup failed")?;

    println!("✅ Database is set up");
    Ok(())
}
