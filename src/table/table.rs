//! Table implementation
//!
//! Columns fixed at load time, rows in file order, linear scans everywhere.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{CastError, Result};

use super::record::{cell_as_id, cell_contains, Record, Row};
use super::ID_COLUMN;

/// In-memory ordered collection of records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column names from the CSV header, in order
    columns: Vec<String>,

    /// Position of the `id` column (meaningless while `columns` is empty)
    id_column: usize,

    /// Rows in file order
    rows: Vec<Record>,
}

/// What an update did to a record
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    /// Columns that were overwritten, in request order
    pub applied: Vec<String>,

    /// Fields that matched no column
    pub ignored: Vec<String>,
}

/// Shape and missing-value counts, for inspection
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: Vec<String>,
    /// Null cell count per column, in column order
    pub missing: Vec<(String, usize)>,
}

impl Table {
    /// A table with no columns and no rows (the failed-load state)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from a header and raw cells
    ///
    /// Fails if the header repeats a name, lacks `id`, a row has the wrong
    /// width, or an id cell is not an integer.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(CastError::Schema(format!("duplicate column '{}'", name)));
            }
        }

        let id_column = columns
            .iter()
            .position(|c| c == ID_COLUMN)
            .ok_or_else(|| CastError::Schema(format!("missing '{}' column", ID_COLUMN)))?;

        let mut records = Vec::with_capacity(rows.len());
        for (line, cells) in rows.into_iter().enumerate() {
            if cells.len() != columns.len() {
                return Err(CastError::Schema(format!(
                    "row {} has {} fields, expected {}",
                    line + 1,
                    cells.len(),
                    columns.len()
                )));
            }

            let id = cell_as_id(&cells[id_column]).ok_or_else(|| {
                CastError::Schema(format!(
                    "row {}: id {} is not an integer",
                    line + 1,
                    cells[id_column]
                ))
            })?;

            records.push(Record::new(id, cells));
        }

        Ok(Self {
            columns,
            id_column,
            rows: records,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of the first record with this id
    pub fn position(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&Record> {
        self.position(id).map(|i| &self.rows[i])
    }

    /// Ids that appear more than once, in first-seen order
    pub fn duplicate_ids(&self) -> Vec<i64> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for record in &self.rows {
            if !seen.insert(record.id) && !dupes.contains(&record.id) {
                dupes.push(record.id);
            }
        }
        dupes
    }

    /// Render a record as a JSON object
    pub fn render(&self, record: &Record) -> Row {
        record.to_row(&self.columns)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Records in `[offset, offset + limit)`, clamped to the table length
    pub fn window(&self, offset: usize, limit: usize) -> &[Record] {
        let start = offset.min(self.rows.len());
        let end = start.saturating_add(limit).min(self.rows.len());
        &self.rows[start..end]
    }

    /// First `n` records
    pub fn head(&self, n: usize) -> &[Record] {
        self.window(0, n)
    }

    /// Records whose cells contain every `(column, needle)` pair
    ///
    /// Needles are matched as lowercase substrings. An empty table matches
    /// nothing; a filter on an unknown column is an error otherwise.
    pub fn filter(&self, filters: &[(&str, &str)]) -> Result<Vec<&Record>> {
        if self.columns.is_empty() {
            return Ok(Vec::new());
        }

        let mut resolved = Vec::with_capacity(filters.len());
        for (column, needle) in filters {
            let index = self
                .column_index(column)
                .ok_or_else(|| CastError::MissingColumn(column.to_string()))?;
            resolved.push((index, needle.to_lowercase()));
        }

        Ok(self
            .rows
            .iter()
            .filter(|record| {
                resolved
                    .iter()
                    .all(|(index, needle)| cell_contains(&record.cells[*index], needle))
            })
            .collect())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Overwrite cells of the record at `index`
    ///
    /// Everything is validated before any cell changes: values must be
    /// scalars, a new `id` must be an integer not held by another record, and
    /// with `reject_unknown` set no unknown field may appear.
    pub fn apply_update(
        &mut self,
        index: usize,
        fields: &Map<String, Value>,
        reject_unknown: bool,
    ) -> Result<UpdateReport> {
        if index >= self.rows.len() {
            return Err(CastError::Internal(format!("row index {} out of range", index)));
        }

        let mut planned = Vec::new();
        let mut ignored = Vec::new();
        let mut new_id = None;

        for (name, value) in fields {
            if value.is_array() || value.is_object() {
                return Err(CastError::invalid(format!(
                    "Field '{}' must be a string, number, boolean or null",
                    name
                )));
            }

            match self.column_index(name) {
                Some(column) => {
                    if column == self.id_column {
                        let id = cell_as_id(value).ok_or_else(|| {
                            CastError::invalid("Field 'id' must be an integer")
                        })?;
                        let taken = self
                            .rows
                            .iter()
                            .enumerate()
                            .any(|(i, r)| i != index && r.id == id);
                        if taken {
                            return Err(CastError::invalid(format!("id {} is already in use", id)));
                        }
                        new_id = Some(id);
                    }
                    planned.push((column, name.clone(), value.clone()));
                }
                None => ignored.push(name.clone()),
            }
        }

        if reject_unknown && !ignored.is_empty() {
            return Err(CastError::invalid(format!(
                "Unknown fields: {}",
                ignored.join(", ")
            )));
        }

        let record = &mut self.rows[index];
        let mut applied = Vec::with_capacity(planned.len());
        for (column, name, value) in planned {
            record.cells[column] = value;
            applied.push(name);
        }
        if let Some(id) = new_id {
            record.id = id;
        }

        Ok(UpdateReport {
            applied,
            ignored,
        })
    }

    /// Put a record back at `index` (undoes an update or a removal)
    pub fn restore(&mut self, index: usize, record: Record) {
        if index < self.rows.len() {
            self.rows[index] = record;
        }
    }

    /// Remove and return the record at `index`
    pub fn remove(&mut self, index: usize) -> Record {
        self.rows.remove(index)
    }

    /// Insert a record at `index`, shifting later rows
    pub fn insert(&mut self, index: usize, record: Record) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, record);
    }

    // =========================================================================
    // Cleaning / Inspection
    // =========================================================================

    /// Remove rows identical to an earlier row; returns how many went
    pub fn drop_duplicates(&mut self) -> usize {
        let before = self.rows.len();
        let mut kept: Vec<Record> = Vec::with_capacity(before);
        for record in self.rows.drain(..) {
            if !kept.iter().any(|k| k.cells == record.cells) {
                kept.push(record);
            }
        }
        self.rows = kept;
        before - self.rows.len()
    }

    /// Replace null cells with empty strings; returns how many were filled
    pub fn fill_missing(&mut self) -> usize {
        let mut filled = 0;
        for record in &mut self.rows {
            for cell in &mut record.cells {
                if cell.is_null() {
                    *cell = Value::String(String::new());
                    filled += 1;
                }
            }
        }
        filled
    }

    pub fn summary(&self) -> TableSummary {
        let missing = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let count = self.rows.iter().filter(|r| r.cells[i].is_null()).count();
                (name.clone(), count)
            })
            .collect();

        TableSummary {
            rows: self.rows.len(),
            columns: self.columns.clone(),
            missing,
        }
    }
}
