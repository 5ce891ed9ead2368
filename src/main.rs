use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::error;

mod config;
mod error;
mod geo;
mod logging;
mod pipeline;
mod schema;
mod table;

use crate::config::Config;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "trip_scrubber")]
#[command(about = "Taxi trip record cleaning and feature derivation pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a TOML config file overriding the default data paths
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: load, clean, derive features, write
    Run,
    /// Load the source and report its detected schema without writing
    Inspect,
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Run => match Pipeline::run(&config) {
            Ok(result) => {
                if !result.rejection_counts.is_empty() {
                    println!("\n📊 Rejection breakdown:");
                    for (reason, count) in &result.rejection_counts {
                        println!("   {}: {}", reason, count);
                    }
                }
            }
            Err(e) => {
                error!("Pipeline failed: {}", e);
                println!("❌ Pipeline failed: {}", e);
                return Err(e.into());
            }
        },
        Commands::Inspect => {
            let table = Pipeline::inspect(&config)?;
            println!("📊 {} rows in source", table.len());
        }
    }
    Ok(())
}
