//! CSV Persister
//!
//! Rewrites the whole table to disk after a mutation.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CastError, Result};
use crate::table::{cell_to_text, Table};

/// Atomically replace `path` with the table's contents
///
/// Writes `<path>.tmp` next to the target, syncs it, then renames it over
/// the target. A crash leaves either the old file or the new one.
pub fn persist_table(path: &Path, table: &Table) -> Result<()> {
    let tmp_path = temp_path(path);

    let result = write_synced(&tmp_path, table).and_then(|_| {
        fs::rename(&tmp_path, path)?;
        Ok(())
    });

    if result.is_err() {
        // Best effort; the original file is untouched either way
        let _ = fs::remove_file(&tmp_path);
    }

    result
}

/// Serialize the table as CSV into any writer
pub fn write_table<W: Write>(sink: W, table: &Table) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(sink);

    if !table.columns().is_empty() {
        writer.write_record(table.columns())?;
    }

    for record in table.records() {
        writer.write_record(record.cells().iter().map(cell_to_text))?;
    }

    writer.flush()?;
    Ok(())
}

fn write_synced(tmp_path: &Path, table: &Table) -> Result<()> {
    let mut buffer = Vec::new();
    write_table(&mut buffer, table)?;

    let mut file = File::create(tmp_path)?;
    file.write_all(&buffer)?;
    file.sync_all()?;
    Ok(())
}

/// `<path>.tmp` in the same directory as `path`
fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("table.csv"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Reject paths that cannot be a file target (used by the CLI before cleaning)
pub fn ensure_file_target(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Err(CastError::Config(format!(
            "{} is a directory, expected a CSV file",
            path.display()
        )));
    }
    Ok(())
}
