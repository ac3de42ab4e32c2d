//! Engine Module
//!
//! The data-access object every request goes through.
//!
//! ## Responsibilities
//! - Load the table once at startup (degrading to empty on failure)
//! - Serve reads concurrently
//! - Serialize mutations and persist the full table after each one
//! - Roll back the in-memory change when persisting fails

use std::path::Path;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{CastError, Result};
use crate::protocol::{
    Command, DeleteResponse, PageMeta, PageRequest, PageResponse, Response, SearchQuery,
    SearchResponse, UpdateResponse,
};
use crate::storage;
use crate::table::{Row, Table};

/// The record store engine
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Reads** (list/search): shared lock, run concurrently
/// - **Writes** (update/delete): exclusive lock held across
///   locate → mutate → persist, so no update is lost between the existence
///   check and the write-back, and the file always matches memory
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The table, behind a single-writer lock
    table: RwLock<Table>,
}

impl Engine {
    /// Open the engine, loading `config.data_file`
    ///
    /// Never fails: a missing or malformed file yields an empty table and an
    /// error-level log line.
    pub fn open(config: Config) -> Self {
        let table = storage::load_or_empty(&config.data_file);
        Self::with_table(config, table)
    }

    /// Build an engine around an already-loaded table
    pub fn with_table(config: Config, table: Table) -> Self {
        Self {
            config,
            table: RwLock::new(table),
        }
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Response> {
        match command {
            Command::Welcome => Ok(Response::welcome()),
            Command::List(request) => self.list(request).map(Response::Page),
            Command::Search(query) => self.search(&query).map(Response::Search),
            Command::Update { id, fields } => self.update(id, &fields).map(Response::Updated),
            Command::Delete { id } => self.delete(id).map(Response::Deleted),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// One page of records in store order
    ///
    /// A window past the end is an empty page, not an error.
    pub fn list(&self, request: PageRequest) -> Result<PageResponse> {
        let table = self.table.read();
        let total = table.len() as u64;

        let data = match request.offset().map(usize::try_from) {
            Some(Ok(offset)) => {
                let limit = usize::try_from(request.per_page()).unwrap_or(usize::MAX);
                table
                    .window(offset, limit)
                    .iter()
                    .map(|r| table.render(r))
                    .collect()
            }
            _ => Vec::new(),
        };

        Ok(PageResponse {
            meta: PageMeta {
                page: request.page(),
                per_page: request.per_page(),
                total_records: total,
                total_pages: request.total_pages(total),
            },
            data,
        })
    }

    /// Records matching every supplied name filter
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let table = self.table.read();
        let data: Vec<Row> = table
            .filter(&query.filters())?
            .into_iter()
            .map(|r| table.render(r))
            .collect();

        Ok(SearchResponse {
            total_matches: data.len(),
            data,
        })
    }

    /// Get one record by id
    pub fn get(&self, id: i64) -> Option<Row> {
        let table = self.table.read();
        table.get(id).map(|r| table.render(r))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Overwrite fields of the record with `id`, then persist
    ///
    /// Unknown fields are ignored with a warning unless the config rejects
    /// them. On a persist failure the record is restored.
    pub fn update(&self, id: i64, fields: &Map<String, Value>) -> Result<UpdateResponse> {
        if fields.is_empty() {
            return Err(CastError::invalid(crate::protocol::MISSING_BODY_MESSAGE));
        }

        let mut table = self.table.write();

        let index = table.position(id).ok_or_else(|| CastError::not_found(id))?;
        let previous = table.records()[index].clone();

        let report = table.apply_update(index, fields, self.config.reject_unknown_fields)?;
        for field in &report.ignored {
            tracing::warn!(id, field = %field, "Invalid field ignored");
        }

        if let Err(e) = storage::persist_table(&self.config.data_file, &table) {
            tracing::error!(id, error = %e, "Failed to persist update; reverting");
            table.restore(index, previous);
            return Err(e);
        }

        tracing::info!(id, fields = ?report.applied, "Character {} updated successfully.", id);

        let updated_record = table.render(&table.records()[index]);
        Ok(UpdateResponse {
            message: format!("Character {} updated successfully", id),
            updated_record,
        })
    }

    /// Remove the record with `id`, then persist
    pub fn delete(&self, id: i64) -> Result<DeleteResponse> {
        let mut table = self.table.write();

        let index = table.position(id).ok_or_else(|| CastError::not_found(id))?;
        let removed = table.remove(index);

        if let Err(e) = storage::persist_table(&self.config.data_file, &table) {
            tracing::error!(id, error = %e, "Failed to persist delete; reverting");
            table.insert(index, removed);
            return Err(e);
        }

        tracing::info!(id, remaining = table.len(), "Character {} deleted successfully.", id);

        Ok(DeleteResponse {
            message: format!("Character {} deleted successfully", id),
            remaining_records: table.len(),
        })
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Column names, in file order
    pub fn columns(&self) -> Vec<String> {
        self.table.read().columns().to_vec()
    }

    /// Copy of the current table
    pub fn snapshot(&self) -> Table {
        self.table.read().clone()
    }

    /// Get the backing file path
    pub fn data_file(&self) -> &Path {
        &self.config.data_file
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
