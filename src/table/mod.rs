//! Table Module
//!
//! The in-memory record store.
//!
//! ## Responsibilities
//! - Hold rows in file order with a fixed column set
//! - Offset/limit windows for pagination
//! - Case-insensitive substring filtering
//! - Validated single-record updates, removal and rollback
//! - Duplicate removal and missing-value filling for offline cleaning
//!
//! ## Data Structure Choice
//! A plain `Vec` of rows: order is the pagination order and every query is a
//! linear scan, so nothing fancier pays for itself.

mod record;
#[allow(clippy::module_inception)]
mod table;

pub use record::{cell_as_id, cell_contains, cell_from_text, cell_to_text, Record, Row};
pub use table::{Table, TableSummary, UpdateReport};

/// Name of the key column every table must carry
pub const ID_COLUMN: &str = "id";
