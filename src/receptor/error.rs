//! Mapping of handler outcomes onto HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::params::ParamError;
use crate::backends::BackendError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidRequest,
    ResourceNotFound,
    UnknownError,
}

/// JSON error body: `{"type": ..., "message": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReceptorError {
    /// A required parameter was missing or malformed. Never reaches the store.
    #[error("{0}")]
    InvalidRequest(String),
    #[error("resource not found")]
    ResourceNotFound,
    /// Any other store failure, carrying the store's message verbatim.
    #[error("{0}")]
    Unknown(String),
}

impl ReceptorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::ResourceNotFound => ErrorKind::ResourceNotFound,
            Self::Unknown(_) => ErrorKind::UnknownError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BackendError> for ReceptorError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::ResourceNotFound => Self::ResourceNotFound,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<ParamError> for ReceptorError {
    fn from(err: ParamError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl IntoResponse for ReceptorError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        match self {
            Self::ResourceNotFound => status.into_response(),
            Self::InvalidRequest(message) | Self::Unknown(message) => {
                (status, Json(ErrorResponse { kind, message })).into_response()
            }
        }
    }
}
