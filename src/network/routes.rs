//! HTTP Routes
//!
//! Maps HTTP requests onto engine commands and engine results onto JSON
//! responses.
//!
//! Every engine call runs on the blocking pool. Whatever goes wrong inside,
//! including a panic, comes back as a `CastError` and is turned into a
//! status code here; internal failures are logged with the operation name
//! and id and answered with a generic 500 body.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::routing::{get, put};
use axum::{Json, Router};
use bytes::Bytes;
use tower_http::trace::TraceLayer;

use crate::engine::Engine;
use crate::error::{CastError, ErrorKind};
use crate::protocol::{self, Command, CommandType, ErrorResponse, Response};

type Params = Result<Query<HashMap<String, String>>, QueryRejection>;

type ApiResult = Result<Json<Response>, ApiError>;

/// Build the axum `Router` serving the character API
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/characters", get(list_characters))
        .route("/characters/search", get(search_characters))
        .route(
            "/characters/:id",
            put(update_character).delete(delete_character),
        )
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /`
async fn welcome(State(engine): State<Arc<Engine>>) -> ApiResult {
    dispatch(engine, Command::Welcome).await
}

/// `GET /characters?page=&per_page=`
async fn list_characters(State(engine): State<Arc<Engine>>, params: Params) -> ApiResult {
    let params = query_params(params, CommandType::List)?;
    let command = protocol::decode_list(&params, engine.config())
        .map_err(|e| ApiError::new(CommandType::List, None, e))?;
    dispatch(engine, command).await
}

/// `GET /characters/search?first_name=&last_name=`
async fn search_characters(State(engine): State<Arc<Engine>>, params: Params) -> ApiResult {
    let params = query_params(params, CommandType::Search)?;
    let command = protocol::decode_search(&params)
        .map_err(|e| ApiError::new(CommandType::Search, None, e))?;
    dispatch(engine, command).await
}

/// `PUT /characters/{id}` with a JSON object body
async fn update_character(
    State(engine): State<Arc<Engine>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let command = protocol::decode_update(&raw_id, &body)
        .map_err(|e| ApiError::new(CommandType::Update, raw_id.parse().ok(), e))?;
    dispatch(engine, command).await
}

/// `DELETE /characters/{id}`
async fn delete_character(
    State(engine): State<Arc<Engine>>,
    Path(raw_id): Path<String>,
) -> ApiResult {
    let command = protocol::decode_delete(&raw_id)
        .map_err(|e| ApiError::new(CommandType::Delete, None, e))?;
    dispatch(engine, command).await
}

async fn route_not_found() -> HttpResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found"))).into_response()
}

// =============================================================================
// Dispatch
// =============================================================================

/// Run a command on the blocking pool and wrap the outcome
async fn dispatch(engine: Arc<Engine>, command: Command) -> ApiResult {
    let command_type = command.command_type();
    let id = command.target_id();

    let result = match tokio::task::spawn_blocking(move || engine.execute(command)).await {
        Ok(result) => result,
        Err(e) => Err(CastError::Internal(format!("handler task failed: {}", e))),
    };

    result
        .map(Json)
        .map_err(|error| ApiError::new(command_type, id, error))
}

fn query_params(
    params: Params,
    command_type: CommandType,
) -> Result<HashMap<String, String>, ApiError> {
    params.map(|Query(p)| p).map_err(|rejection| {
        ApiError::new(
            command_type,
            None,
            CastError::invalid(format!("Invalid query string: {}", rejection.body_text())),
        )
    })
}

// =============================================================================
// Errors
// =============================================================================

/// A failed request, with enough context to log it
#[derive(Debug)]
pub struct ApiError {
    command_type: CommandType,
    id: Option<i64>,
    error: CastError,
}

impl ApiError {
    pub fn new(command_type: CommandType, id: Option<i64>, error: CastError) -> Self {
        Self {
            command_type,
            id,
            error,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        status_for(self.error.kind())
    }
}

/// HTTP status for each error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> HttpResponse {
        let status = self.status_code();
        let operation = self.command_type.as_str();

        let body = match self.error.kind() {
            ErrorKind::Internal => {
                tracing::error!(operation, id = ?self.id, error = %self.error, "Error in {} handler", operation);
                ErrorResponse::internal()
            }
            ErrorKind::InvalidArgument | ErrorKind::NotFound => {
                tracing::debug!(operation, id = ?self.id, error = %self.error, "Rejected request");
                ErrorResponse::new(self.error.to_string())
            }
        };

        (status, Json(body)).into_response()
    }
}
