//! Record and cell conversions
//!
//! Cells are JSON scalars. CSV text is typed on the way in and rendered back
//! to text on the way out.

use serde_json::{Map, Number, Value};

/// A record rendered as a JSON object, keys in column order
pub type Row = Map<String, Value>;

/// One row of the table
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Value of the `id` column (kept in sync with `cells`)
    pub(crate) id: i64,

    /// One cell per column, aligned with the table's columns
    pub(crate) cells: Vec<Value>,
}

impl Record {
    pub(crate) fn new(id: i64, cells: Vec<Value>) -> Self {
        Self { id, cells }
    }

    /// The record's id
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Cells in column order
    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    /// Render as a JSON object using the given column names
    pub fn to_row(&self, columns: &[String]) -> Row {
        columns
            .iter()
            .cloned()
            .zip(self.cells.iter().cloned())
            .collect()
    }
}

/// Infer a typed cell from raw CSV text
///
/// Empty → null, then `True`/`False`, then i64, then finite f64, else the
/// text itself. A typed value is only used when `cell_to_text` gives back
/// exactly the same text, so `0123`, `+44`, `1.50`, `1e3` and `true` stay
/// strings and a rewrite of the file never alters cells nobody touched.
pub fn cell_from_text(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }

    match text {
        "True" => return Value::Bool(true),
        "False" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(n) = text.parse::<i64>() {
        if n.to_string() == text {
            return Value::Number(n.into());
        }
    }

    if let Ok(f) = text.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            if n.to_string() == text {
                return Value::Number(n);
            }
        }
    }

    Value::String(text.to_string())
}

/// Render a cell back to CSV text
pub fn cell_to_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // Never stored by the update path, but keep the output readable
        other => other.to_string(),
    }
}

/// Case-insensitive substring test; `needle` must already be lowercase
pub fn cell_contains(cell: &Value, needle: &str) -> bool {
    match cell {
        Value::Null => false,
        Value::String(s) => s.to_lowercase().contains(needle),
        other => cell_to_text(other).to_lowercase().contains(needle),
    }
}

/// Extract an id from a cell, accepting integers only
pub fn cell_as_id(cell: &Value) -> Option<i64> {
    cell.as_i64()
}
