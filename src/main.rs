use catalog::Catalog;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use configuration::ServerOverrides;
use configuration::settings::Settings;
use core_types::DigimonStats;
use database::DbRepository;
use std::path::PathBuf;
use std::sync::Arc;

/// The main entry point for the Digimon query API.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already carry DATABASE_URL.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_settings(cli.config.as_deref())?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(overrides) => {
            settings.apply_overrides(&overrides);
            web_server::run_server(&settings).await?;
        }
        Commands::Stats => handle_stats(&settings).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A read-only REST API over the Digimon dataset.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to ./config.toml if present).
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API.
    Serve(ServerOverrides),
    /// Print the total and per-stage Digimon counts.
    Stats,
}

// ==============================================================================
// Stats Command Logic
// ==============================================================================

async fn handle_stats(settings: &Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    let catalog = Catalog::new(Arc::new(DbRepository::new(db_pool)));

    let stats = catalog.get_stats().await?;
    println!("{}", render_stats(&stats));

    Ok(())
}

fn render_stats(stats: &DigimonStats) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Stage", "Count"]);

    for row in &stats.by_stage {
        table.add_row(vec![
            Cell::new(row.stage.as_deref().unwrap_or("-")),
            Cell::new(row.count).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(stats.total).set_alignment(CellAlignment::Right),
    ]);

    table
}
