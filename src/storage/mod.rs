//! Storage Module
//!
//! Loads the table from its CSV file and writes it back.
//!
//! ## Responsibilities
//! - Parse a headered CSV into typed cells
//! - Degrade to an empty table when the file is missing or malformed
//! - Rewrite the full file after every mutation, atomically
//!
//! ## File Format
//! ```text
//! id,first_name,last_name,...     <- header, fixes the column set
//! 1,Ross,Geller,...               <- one row per record, file order kept
//! 2,Rachel,Green,...
//! ```
//!
//! ## Write Protocol
//! ```text
//! table ──► friends_data.csv.tmp ──fsync──► rename ──► friends_data.csv
//! ```

mod loader;
mod writer;

pub use loader::{load_or_empty, load_table, read_table};
pub use writer::{ensure_file_target, persist_table, write_table};
