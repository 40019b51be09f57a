//! Operator CLI for the stockroom core.
//!
//! # Responsibility
//! - Verify `stockroom_core` linkage with a deterministic probe.
//! - Initialize a store file and print its inventory for local checks.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stockroom_core::db::migrations::current_user_version;
use stockroom_core::{open_store, InventoryService, SqliteInventoryRepository, StoreConfig};

/// Stockroom inventory store tool
#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print core ping and version (default)
    Probe,

    /// Create or migrate a store and seed the bootstrap admin
    Init {
        /// Database file; overrides STOCKROOM_DB_PATH
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// List inventory rows
    #[command(alias = "ls")]
    Inventory {
        /// Database file; overrides STOCKROOM_DB_PATH
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command.unwrap_or(Commands::Probe) {
        Commands::Probe => {
            println!("stockroom_core ping={}", stockroom_core::ping());
            println!("stockroom_core version={}", stockroom_core::core_version());
            Ok(())
        }
        Commands::Init { db } => cmd_init(db),
        Commands::Inventory { db } => cmd_inventory(db),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(db: Option<PathBuf>) -> Result<StoreConfig, String> {
    let mut config = StoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(path) = db {
        config.db_path = path;
    }
    Ok(config)
}

fn cmd_init(db: Option<PathBuf>) -> Result<(), String> {
    let config = load_config(db)?;
    let conn = open_store(&config).map_err(|err| err.to_string())?;
    let version = current_user_version(&conn).map_err(|err| err.to_string())?;

    println!("store={} schema_version={version}", config.db_path.display());
    if config.bootstrap_admin_password.is_none() {
        println!("warning: bootstrap admin uses the built-in default password; set STOCKROOM_ADMIN_PASSWORD");
    }
    Ok(())
}

fn cmd_inventory(db: Option<PathBuf>) -> Result<(), String> {
    let config = load_config(db)?;
    let conn = open_store(&config).map_err(|err| err.to_string())?;
    let repo = SqliteInventoryRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let items = InventoryService::new(repo)
        .list()
        .map_err(|err| err.to_string())?;

    if items.is_empty() {
        println!("Inventory is empty.");
        return Ok(());
    }

    println!("{:>6}  {:<32}  {:>8}", "ID", "ITEM", "QTY");
    println!("{:-<50}", "");
    for item in items {
        println!(
            "{:>6}  {:<32}  {:>8}",
            item.item_id, item.item_name, item.item_quantity
        );
    }
    Ok(())
}
