pub mod cleaning;
pub mod features;
pub mod loader;
pub mod writer;

use crate::config::Config;
use crate::error::Result;
use crate::table::Table;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Result of a complete pipeline run.
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub rejected_rows: usize,
    pub rejection_counts: Vec<(String, usize)>,
    pub output_file: PathBuf,
    pub log_file: Option<PathBuf>,
}

pub struct Pipeline;

impl Pipeline {
    /// Run the full pipeline: load, clean, derive features, write. The
    /// rejection log is written only when rows were removed.
    #[instrument(skip(config))]
    pub fn run(config: &Config) -> Result<PipelineResult> {
        info!("🚀 Starting trip scrubbing pipeline");
        println!("🚀 Starting trip scrubbing pipeline");

        let table = loader::load_table(&config.source_path)?;
        let total_rows = table.len();

        let outcome = cleaning::clean(&table);

        let log_file = if outcome.rejected.is_empty() {
            None
        } else {
            writer::write_table(&outcome.rejected, &config.log_path)?;
            info!(
                "🗂️ Logged {} removed or suspicious records to {}",
                outcome.rejected.len(),
                config.log_path.display()
            );
            println!(
                "🗂️ Logged {} removed or suspicious records to {}",
                outcome.rejected.len(),
                config.log_path.display()
            );
            Some(config.log_path.clone())
        };

        let derived = features::derive_features(&outcome.kept);
        writer::write_table(&derived, &config.output_path)?;

        let result = PipelineResult {
            total_rows,
            kept_rows: derived.len(),
            rejected_rows: outcome.rejected.len(),
            rejection_counts: outcome
                .reason_counts
                .iter()
                .map(|(reason, count)| (reason.label().to_string(), *count))
                .collect(),
            output_file: config.output_path.clone(),
            log_file,
        };

        Self::persist_summary(&result, config)?;

        info!("🎉 Pipeline complete: {} of {} rows kept", result.kept_rows, total_rows);
        println!(
            "\n🎉 Data processing complete! {} of {} rows kept.",
            result.kept_rows, total_rows
        );
        Ok(result)
    }

    /// Load the source and report its detected schema without writing
    /// anything. Used by the `inspect` subcommand.
    pub fn inspect(config: &Config) -> Result<Table> {
        let table = loader::load_table(&config.source_path)?;
        let schema = table.schema();

        println!("📋 Columns: {}", table.columns.join(", "));
        let known: Vec<&str> = schema.known_columns().iter().map(|c| c.name()).collect();
        println!("📋 Recognized: {}", known.join(", "));
        let essential: Vec<&str> = schema
            .essential_columns()
            .iter()
            .map(|c| c.name())
            .collect();
        println!("📋 Essential: {}", essential.join(", "));

        Ok(table)
    }

    /// Persist the run result as JSON next to the rejection log.
    fn persist_summary(result: &PipelineResult, config: &Config) -> Result<()> {
        let summary_path = config
            .log_path
            .parent()
            .map(|p| p.join("run_summary.json"))
            .unwrap_or_else(|| PathBuf::from("run_summary.json"));

        if let Some(parent) = summary_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json_content = serde_json::to_string_pretty(result)?;
        fs::write(&summary_path, json_content)?;

        info!("💾 Saved run summary to {}", summary_path.display());
        Ok(())
    }
}
