// Lucy Radio - keeps internet radio looping in voice channels
// This binary runs the startup gate and feeds the coordinator from stdin

use anyhow::Result;
use clap::{Parser, Subcommand};
use lucy_radio::{
    catalog::{Catalog, CatalogError},
    coordinator::events::forward_lines,
    player::{ConsoleMessenger, ConsolePlayer},
    Config, Coordinator, EventHandler, StateStore, UserId,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lucy-radio")]
#[command(about = "Looping radio jukebox with tester feedback prompts")]
struct Args {
    /// Config file (defaults to <config dir>/lucy-radio/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the station catalog and exit
    Check,
    /// Handle JSON-line events from stdin until EOF
    Run,
}

fn init_logging(log_dir: &Path, dev: bool) -> Result<()> {
    let base_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lucy_radio=debug"));

    if dev {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_env_filter(base_filter)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        return Ok(());
    }

    std::fs::create_dir_all(log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(log_dir, "lucy-radio.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(base_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Keep the writer alive for the whole process
    std::mem::forget(guard);

    Ok(())
}

/// Load the catalog and refuse to go further if any station identity is ambiguous
fn load_checked_catalog(path: &Path) -> Result<Catalog> {
    let catalog = Catalog::load(path)?;

    if let Err(e) = catalog.ensure_unique() {
        if let CatalogError::Duplicates(duplicates) = &e {
            for duplicate in duplicates {
                error!("Duplicated station: {}", duplicate);
                eprintln!("duplicated station: {}", duplicate);
            }
        }
        return Err(e.into());
    }

    Ok(catalog)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    init_logging(&config.log_dir, args.dev)?;
    info!("📻 Lucy Radio starting up");

    let catalog = load_checked_catalog(&config.stations_path)?;
    info!("Catalog OK: {} unique stations", catalog.station_count());

    match args.command {
        Command::Check => {
            println!("{} stations, no duplicates", catalog.station_count());
        }
        Command::Run => {
            let mut coordinator = Coordinator::new(
                catalog,
                StateStore::new(),
                ConsolePlayer::new(),
                ConsoleMessenger::new(),
                UserId::system(&config.system_user),
            )
            .with_default_policy(config.tester.default_policy);

            let mut events = EventHandler::new();
            let sender = events.sender();

            // Plain thread: a blocked stdin read must not hold the runtime open
            let reader = std::thread::spawn(move || forward_lines(std::io::stdin().lock(), sender));

            coordinator.run(&mut events).await;

            if reader.is_finished() {
                match reader.join() {
                    Ok(Ok(forwarded)) => info!("Processed {} events, bye", forwarded),
                    Ok(Err(e)) => warn!("Event input failed: {}", e),
                    Err(_) => warn!("Event reader panicked"),
                }
            } else {
                debug!("Event reader still blocked on stdin, not waiting for it");
            }
        }
    }

    Ok(())
}
