use crate::error::{Result, ScrubberError};
use crate::table::Table;
use std::path::Path;
use tracing::info;

/// Reads a delimited source file into a [`Table`]. Purely structural: no row
/// validation happens here, only parsing of the header and cell grid.
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(ScrubberError::SourceNotFound(path.to_path_buf()));
    }

    info!("🔹 Loading dataset from {}", path.display());
    println!("🔹 Loading dataset from {}...", path.display());

    let mut reader = csv::ReaderBuilder::new().flexible(false).from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    info!("✅ Loaded {} rows", table.len());
    println!("✅ Loaded {} rows.", table.len());
    Ok(table)
}
