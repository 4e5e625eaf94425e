//! Store Hub CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the collection tables
//! store-hub-cli migrate
//!
//! # Seed the database with demo data
//! store-hub-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the collection tables if they do not exist
//! - `seed` - Insert demo users, stores, and products

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "store-hub-cli")]
#[command(author, version, about = "Store Hub CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the collection tables
    Migrate,
    /// Seed the database with demo data
    Seed,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
