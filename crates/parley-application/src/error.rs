//! Boundary errors handed to the transport layer.

use parley_core::ParleyError;
use serde::Serialize;
use thiserror::Error;

/// Stable error classification exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInput,
    NotFound,
    Conflict,
    ModelUnavailable,
    StorageFailure,
    Internal,
}

impl ErrorCode {
    /// HTTP status the transport layer should answer with.
    pub fn http_status(self) -> u16 {
        match self {
            ErrorCode::InvalidInput => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::ModelUnavailable => 502,
            ErrorCode::StorageFailure | ErrorCode::Internal => 500,
        }
    }
}

/// Error returned by [`crate::SessionManager`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }
}

impl From<ParleyError> for ApiError {
    fn from(err: ParleyError) -> Self {
        let code = match &err {
            ParleyError::NotFound { .. } => ErrorCode::NotFound,
            ParleyError::Conflict { .. } => ErrorCode::Conflict,
            ParleyError::Model(_) => ErrorCode::ModelUnavailable,
            ParleyError::Storage { .. } => ErrorCode::StorageFailure,
            ParleyError::Config(_) | ParleyError::Internal(_) => ErrorCode::Internal,
        };
        Self::new(code, err.to_string())
    }
}
