//! Protocol codec
//!
//! Turns raw query parameters, path segments and body bytes into commands.
//! Everything here is transport-agnostic: the HTTP layer hands over strings
//! and bytes, the codec hands back validated commands or invalid-argument
//! errors.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{CastError, Result};

use super::{Command, PageRequest, SearchQuery};

/// Query parameter names
pub const PAGE_PARAM: &str = "page";
pub const PER_PAGE_PARAM: &str = "per_page";
pub const FIRST_NAME_PARAM: &str = "first_name";
pub const LAST_NAME_PARAM: &str = "last_name";

/// Message for a missing, empty or non-object update body
pub const MISSING_BODY_MESSAGE: &str = "Request must contain JSON body";

// =============================================================================
// Listing / Search
// =============================================================================

/// Decode `?page=&per_page=` into a list command
///
/// Absent values fall back to the configured defaults; present values must
/// be integers ≥ 1.
pub fn decode_list(params: &HashMap<String, String>, config: &Config) -> Result<Command> {
    let page = int_param(params, PAGE_PARAM, config.default_page)?;
    let per_page = int_param(params, PER_PAGE_PARAM, config.default_per_page)?;
    Ok(Command::List(PageRequest::new(page, per_page)?))
}

/// Decode `?first_name=&last_name=` into a search command
pub fn decode_search(params: &HashMap<String, String>) -> Result<Command> {
    let query = SearchQuery::new(
        params.get(FIRST_NAME_PARAM).map(String::as_str),
        params.get(LAST_NAME_PARAM).map(String::as_str),
    )?;
    Ok(Command::Search(query))
}

fn int_param(params: &HashMap<String, String>, name: &str, default: u64) -> Result<i64> {
    match params.get(name) {
        None => i64::try_from(default)
            .map_err(|_| CastError::Config(format!("default {} out of range", name))),
        Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
            CastError::invalid("page and per_page must be positive integers")
        }),
    }
}

// =============================================================================
// Update / Delete
// =============================================================================

/// Decode a path segment into a character id
///
/// Anything that is not an integer cannot name a record, so it is reported
/// as not-found.
pub fn decode_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| CastError::CharacterNotFound(raw.to_string()))
}

/// Decode a raw update body into field → value pairs
///
/// The body must be a non-empty JSON object.
pub fn decode_update_body(body: &[u8]) -> Result<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(CastError::invalid(MISSING_BODY_MESSAGE));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| CastError::invalid(format!("Malformed JSON body: {}", e)))?;

    match value {
        Value::Object(fields) if !fields.is_empty() => Ok(fields),
        _ => Err(CastError::invalid(MISSING_BODY_MESSAGE)),
    }
}

pub fn decode_update(raw_id: &str, body: &[u8]) -> Result<Command> {
    let id = decode_id(raw_id)?;
    let fields = decode_update_body(body)?;
    Ok(Command::Update { id, fields })
}

pub fn decode_delete(raw_id: &str) -> Result<Command> {
    Ok(Command::Delete {
        id: decode_id(raw_id)?,
    })
}
