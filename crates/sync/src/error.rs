//! Unified error handling for the sync API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::shopify::StoreError;
use crate::sync::SyncError;

/// Application-level error type for the sync API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Shopify call failed.
    #[error("Shopify error: {0}")]
    Store(#[from] StoreError),

    /// Store has nothing to operate on.
    #[error("{0}")]
    EmptyCatalog(&'static str),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Store(e) => Self::Store(e),
            SyncError::EmptyCatalog(message) => Self::EmptyCatalog(message),
            SyncError::InvalidInput(message) => Self::BadRequest(message),
        }
    }
}

/// Failure body: `{ "success": false, "message": ... }`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(StoreError::InvalidToken) => StatusCode::UNAUTHORIZED,
            Self::Store(StoreError::ChannelNotFound(_) | StoreError::UserErrors(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Store(e) => match e.status() {
                Some(401 | 403) => StatusCode::UNAUTHORIZED,
                Some(404) => StatusCode::NOT_FOUND,
                Some(429) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::EmptyCatalog(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Sync request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Sync request rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}
