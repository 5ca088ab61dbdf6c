//! Error types for the gateway layer

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use huddle_chats::ChatError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Edit window expired")]
    EditWindowExpired,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) | GatewayError::EditWindowExpired => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::DatabaseError(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the response body. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::InvalidRequest(message)
            | GatewayError::NotFound(message)
            | GatewayError::Conflict(message) => message.clone(),
            GatewayError::EditWindowExpired => "Edit window expired".to_string(),
            GatewayError::PayloadTooLarge => "File too large".to_string(),
            GatewayError::DatabaseError(_) | GatewayError::InternalError(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({ "error": self.public_message() });

        (status, Json(body)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<ChatError> for GatewayError {
    fn from(error: ChatError) -> Self {
        match error {
            ChatError::MessageNotFound { .. } => GatewayError::NotFound("Message not found".to_string()),
            ChatError::EditWindowExpired => GatewayError::EditWindowExpired,
            ChatError::MessageDeleted => GatewayError::Conflict("Message deleted".to_string()),
            ChatError::Validation { message } => GatewayError::InvalidRequest(message),
            ChatError::Storage(e) => {
                error!(error = %e, "storage failure");
                GatewayError::DatabaseError(e.to_string())
            }
        }
    }
}

impl From<MultipartError> for GatewayError {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge
        } else {
            GatewayError::InvalidRequest(format!("Invalid form data: {}", error.body_text()))
        }
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(error: std::io::Error) -> Self {
        error!(error = %error, "upload storage failure");
        GatewayError::InternalError(error.to_string())
    }
}
