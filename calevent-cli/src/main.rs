mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use calevent_core::EventId;
use calevent_core::config::CaleventConfig;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calevent")]
#[command(about = "Resolve organizers and spread UIDs across recurring calendar events")]
struct Cli {
    /// Event store file (defaults to store_path from the config)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// User directory file (defaults to users_path from the config)
    #[arg(long, global = true)]
    users: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List recurring families with their UIDs and organizers
    Show,
    /// Resolve the organizer of one event
    ResolveOrganizer { event: u64 },
    /// Resolve the organizer of every event
    ResolveAll,
    /// Spread an event's UID across its recurring family
    SpreadUid { event: u64 },
    /// Generate a UID for an event's family and spread it
    NewUid { event: u64 },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let (store_path, users_path) = resolve_paths(cli.store, cli.users)?;

    match cli.command {
        Commands::Show => commands::show::run(&store_path),
        Commands::ResolveOrganizer { event } => {
            commands::organizer::run(&store_path, &users_path, Some(EventId(event)))
        }
        Commands::ResolveAll => commands::organizer::run(&store_path, &users_path, None),
        Commands::SpreadUid { event } => commands::uid::spread(&store_path, EventId(event)),
        Commands::NewUid { event } => commands::uid::assign(&store_path, EventId(event)),
    }
}

/// Paths given on the command line win; the config is only loaded (and
/// created) when one of them is missing.
fn resolve_paths(
    store: Option<PathBuf>,
    users: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf)> {
    if let (Some(store), Some(users)) = (&store, &users) {
        return Ok((store.clone(), users.clone()));
    }

    let config = CaleventConfig::load()?;
    Ok((
        store.unwrap_or_else(|| config.store_path()),
        users.unwrap_or_else(|| config.users_path()),
    ))
}
