//! Route definitions for the Parley server.
//!
//! Every endpoint is a POST taking and returning JSON, matching what the chat
//! front end already sends.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
};
use parley_application::{ApiError, ErrorCode, SessionManager};
use parley_core::session::Message;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const RECORD_EXTENSION: &str = ".json";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<SessionManager>,
}

#[derive(Debug, Deserialize)]
pub struct ModelRequest {
    pub user_query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub messages: Vec<Message>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorCode,
}

/// Wraps [`ApiError`] so handlers can return it directly.
#[derive(Debug)]
pub struct AppError(ApiError);

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.0.message,
            code: self.0.code,
        };
        (status, Json(body)).into_response()
    }
}

/// Build the router with all conversation routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/instantiate", post(instantiate))
        .route("/model_response", post(model_response))
        .route("/list_conversations", post(list_conversations))
        .route("/load_conversation", post(load_conversation))
        .with_state(state)
}

async fn instantiate(State(state): State<AppState>) -> StatusCode {
    state.manager.create_or_reset_session().await;
    StatusCode::OK
}

async fn model_response(
    State(state): State<AppState>,
    Json(request): Json<ModelRequest>,
) -> Result<Json<ModelResponse>, AppError> {
    let response = state.manager.handle_user_message(&request.user_query).await?;
    Ok(Json(ModelResponse { response }))
}

async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<ListResponse>, AppError> {
    let files = state
        .manager
        .list_records()
        .await?
        .into_iter()
        .map(|id| format!("{id}{RECORD_EXTENSION}"))
        .collect();
    Ok(Json(ListResponse { files }))
}

async fn load_conversation(
    State(state): State<AppState>,
    Json(request): Json<LoadRequest>,
) -> Result<Json<LoadResponse>, AppError> {
    let id = request
        .file
        .strip_suffix(RECORD_EXTENSION)
        .unwrap_or(&request.file);
    let messages = state.manager.load_record(id).await?;
    Ok(Json(LoadResponse { messages }))
}
