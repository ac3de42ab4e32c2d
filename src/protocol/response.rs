//! Response definitions
//!
//! JSON bodies returned to clients.

use serde::{Deserialize, Serialize};

use crate::table::Row;

/// Greeting for `GET /`
pub const WELCOME_MESSAGE: &str = "Welcome to the Friends Cast REST API!";

/// Body of every 500 response; internals are never exposed
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u64,
    pub per_page: u64,
    pub total_records: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    pub meta: PageMeta,
    pub data: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total_matches: usize,
    pub data: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub message: String,
    pub updated_record: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub remaining_records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A response to send to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Welcome(WelcomeResponse),
    Page(PageResponse),
    Search(SearchResponse),
    Updated(UpdateResponse),
    Deleted(DeleteResponse),
}

impl Response {
    pub fn welcome() -> Self {
        Response::Welcome(WelcomeResponse {
            message: WELCOME_MESSAGE.to_string(),
        })
    }
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR_MESSAGE)
    }
}
