use crate::error::{Result, ScrubberError};
use crate::table::Table;
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialize a table as comma-delimited text with a header row, creating any
/// missing parent directory. No partial-file cleanup on failure.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| ScrubberError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| into_write_error(e, path))?;
    writer
        .write_record(&table.columns)
        .map_err(|e| into_write_error(e, path))?;
    for row in &table.rows {
        writer.write_record(row).map_err(|e| into_write_error(e, path))?;
    }
    writer.flush().map_err(|e| ScrubberError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("💾 Saved {} rows to {}", table.len(), path.display());
    println!("💾 Saved {} rows to {}", table.len(), path.display());
    Ok(())
}

fn into_write_error(e: csv::Error, path: &Path) -> ScrubberError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => ScrubberError::Write {
            path: path.to_path_buf(),
            source: io,
        },
        other => ScrubberError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(format!("{:?}", other)),
        },
    }
}
