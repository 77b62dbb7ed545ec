//! socialctl - manage a small social graph from the terminal
//!
//! - Interactive menu (default): people, friendships, recommendations, statistics
//! - `setup`: schema bootstrap
//! - `dedupe`: duplicate-name cleanup

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use socialctl_core::{MemoryStore, SocialConfig, SocialService};
use socialctl_db::{ensure_tables, Database, PgFriendshipRepo, PgPersonRepo};
use tracing::info;

mod commands;
mod menu;
mod render;
mod tracing_setup;
mod ui;

use commands::DedupeArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "socialctl",
    version,
    about = "Manage people, friendships and recommendations in a social graph"
)]
struct Cli {
    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the `telemetry` feature)
    #[arg(long, global = true)]
    otel: bool,

    /// Suppress progress spinners
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// PostgreSQL connection URL
    #[arg(long, global = true, env = "SOCIALCTL_DATABASE_URL", value_name = "URL")]
    database_url: Option<String>,

    /// Keep everything in memory for this session (menu only)
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive menu (default when no command is given)
    Menu,
    /// Create tables, the unique-name constraint and lookup indexes
    Setup,
    /// Remove people whose names duplicate an earlier record
    Dedupe(DedupeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    ui::init_quiet_mode(cli.quiet);

    let mut config = SocialConfig::load().context("Failed to load configuration")?;
    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }

    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
        level: config.log_level.clone(),
    })
    .ok();

    let result = run(cli, config).await;
    tracing_setup::shutdown_otel();
    result
}

async fn run(cli: Cli, config: SocialConfig) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Menu);

    if cli.ephemeral {
        if !matches!(command, Commands::Menu) {
            bail!("--ephemeral only applies to the interactive menu");
        }
        info!("using in-memory store; nothing will be persisted");
        let store = Arc::new(MemoryStore::new());
        return menu::run(&SocialService::new(store.clone(), store)).await;
    }

    let db = Database::new(config.database);
    let result = run_with_database(&db, command).await;
    db.teardown().await;
    result
}

async fn run_with_database(db: &Database, command: Commands) -> Result<()> {
    ui::with_spinner_async("Connecting to database", "Database ready", ensure_tables(db))
        .await
        .context("Failed to prepare database")?;

    let service = SocialService::new(
        Arc::new(PgPersonRepo::new(db.clone())),
        Arc::new(PgFriendshipRepo::new(db.clone())),
    );

    match command {
        Commands::Menu => menu::run(&service).await,
        Commands::Setup => commands::run_setup(db).await,
        Commands::Dedupe(args) => commands::run_dedupe(args, &service).await,
    }
}
