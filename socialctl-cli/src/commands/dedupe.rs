//! `socialctl dedupe` - collapse people sharing a name (case-insensitive)
//!
//! Keeps the earliest-created record of each group and deletes the rest,
//! together with their friendships. Run this before `socialctl setup` on a
//! database that predates the unique-name index.

use anyhow::{Context, Result};
use clap::Parser;
use socialctl_core::SocialService;

use crate::{render, ui};

#[derive(Parser, Debug)]
#[command(about = "Remove people whose names duplicate an earlier record")]
pub struct DedupeArgs {
    /// Report what would be removed without deleting anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

pub async fn run_dedupe(args: DedupeArgs, service: &SocialService) -> Result<()> {
    let label = if args.dry_run {
        "Scanning for duplicate names"
    } else {
        "Removing duplicate names"
    };

    let report = ui::with_spinner_async(label, "Scan complete", service.dedupe_names(args.dry_run))
        .await
        .context("Duplicate cleanup failed")?;

    print!("{}", render::format_dedupe(&report));
    Ok(())
}
