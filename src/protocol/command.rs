//! Command definitions
//!
//! Validated requests the engine can execute.

use serde_json::{Map, Value};

use crate::error::{CastError, Result};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Welcome,
    List,
    Search,
    Update,
    Delete,
}

impl CommandType {
    /// Operation name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Welcome => "welcome",
            CommandType::List => "list_characters",
            CommandType::Search => "search_characters",
            CommandType::Update => "update_character",
            CommandType::Delete => "delete_character",
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Liveness / welcome message
    Welcome,

    /// One page of records in store order
    List(PageRequest),

    /// Substring search over name columns
    Search(SearchQuery),

    /// Overwrite fields of one record
    Update { id: i64, fields: Map<String, Value> },

    /// Remove one record
    Delete { id: i64 },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Welcome => CommandType::Welcome,
            Command::List(_) => CommandType::List,
            Command::Search(_) => CommandType::Search,
            Command::Update { .. } => CommandType::Update,
            Command::Delete { .. } => CommandType::Delete,
        }
    }

    /// Target id, for commands that have one
    pub fn target_id(&self) -> Option<i64> {
        match self {
            Command::Update { id, .. } | Command::Delete { id } => Some(*id),
            _ => None,
        }
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// A validated page request (both values ≥ 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    per_page: u64,
}

impl PageRequest {
    pub fn new(page: i64, per_page: i64) -> Result<Self> {
        if page < 1 || per_page < 1 {
            return Err(CastError::invalid("page and per_page must be positive integers"));
        }
        Ok(Self {
            page: page as u64,
            per_page: per_page as u64,
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Zero-based offset of the first record, `None` if it overflows
    pub fn offset(&self) -> Option<u64> {
        (self.page - 1).checked_mul(self.per_page)
    }

    /// `ceil(total / per_page)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page)
    }
}

// =============================================================================
// Search
// =============================================================================

/// Column searched by the `first_name` parameter
pub const FIRST_NAME_COLUMN: &str = "first_name";

/// Column searched by the `last_name` parameter
pub const LAST_NAME_COLUMN: &str = "last_name";

/// Normalized search needles (trimmed, lowercased, at least one present)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    first_name: Option<String>,
    last_name: Option<String>,
}

impl SearchQuery {
    pub fn new(first_name: Option<&str>, last_name: Option<&str>) -> Result<Self> {
        let first_name = normalize(first_name);
        let last_name = normalize(last_name);

        if first_name.is_none() && last_name.is_none() {
            return Err(CastError::invalid("Provide at least first_name or last_name"));
        }

        Ok(Self {
            first_name,
            last_name,
        })
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// `(column, needle)` pairs for every supplied name
    pub fn filters(&self) -> Vec<(&str, &str)> {
        let mut filters = Vec::with_capacity(2);
        if let Some(first) = &self.first_name {
            filters.push((FIRST_NAME_COLUMN, first.as_str()));
        }
        if let Some(last) = &self.last_name {
            filters.push((LAST_NAME_COLUMN, last.as_str()));
        }
        filters
    }
}

fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}
