//! CSV Loader
//!
//! Reads a headered CSV file into a `Table`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::table::{cell_from_text, Table};

/// Load a table from a CSV file
///
/// Fails on I/O errors, malformed rows, a duplicate or missing `id` header,
/// or a non-integer id.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = File::open(path)?;
    read_table(file)
}

/// Load a table, degrading to an empty one on any failure
///
/// The error is logged with the path; nothing is propagated.
pub fn load_or_empty(path: &Path) -> Table {
    match load_table(path) {
        Ok(table) => {
            tracing::info!(path = %path.display(), rows = table.len(), "CSV loaded successfully");

            let dupes = table.duplicate_ids();
            if !dupes.is_empty() {
                tracing::warn!(path = %path.display(), ids = ?dupes, "Duplicate ids in CSV; lookups use the first match");
            }

            table
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Error loading CSV");
            Table::empty()
        }
    }
}

/// Parse CSV from any reader (header row first)
pub fn read_table<R: Read>(source: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(source);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(cell_from_text).collect());
    }

    Table::from_rows(columns, rows)
}
