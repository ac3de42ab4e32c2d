//! Protocol Module
//!
//! Request commands and response bodies exchanged with clients.
//!
//! ## Requests
//! ```text
//! GET    /                                      → Welcome
//! GET    /characters?page=&per_page=            → List(PageRequest)
//! GET    /characters/search?first_name=&last_name= → Search(SearchQuery)
//! PUT    /characters/{id}   {field: value, ...} → Update { id, fields }
//! DELETE /characters/{id}                       → Delete { id }
//! ```
//!
//! ## Responses
//! - 200: one of the `Response` bodies
//! - 400: `{"error": "..."}` for invalid arguments
//! - 404: `{"error": "Character with id N not found"}`
//! - 500: `{"error": "Internal server error"}`

mod command;
mod response;
mod codec;

pub use command::{
    Command, CommandType, PageRequest, SearchQuery, FIRST_NAME_COLUMN, LAST_NAME_COLUMN,
};
pub use response::{
    DeleteResponse, ErrorResponse, PageMeta, PageResponse, Response, SearchResponse,
    UpdateResponse, WelcomeResponse, INTERNAL_ERROR_MESSAGE, WELCOME_MESSAGE,
};
pub use codec::{
    decode_delete, decode_id, decode_list, decode_search, decode_update, decode_update_body,
    FIRST_NAME_PARAM, LAST_NAME_PARAM, MISSING_BODY_MESSAGE, PAGE_PARAM, PER_PAGE_PARAM,
};
