//! HTTP error type.
//!
//! Every failure leaves the server as `{ "ok": false, "error": <code>,
//! "message": <text> }` with a status that tells the client whether to fix
//! the request (4xx) or look at the printer (502/504).

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::RelayError;
use crate::job::raw::RawError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // ========== Client errors ==========
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Printer '{0}' not found")]
    NotFound(String),

    #[error("{0}")]
    Decode(String),

    #[error("{0}")]
    UnsupportedMedia(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    // ========== Printer errors ==========
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Timeout(String),

    // ========== Server errors ==========
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) | ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Connection(_) => StatusCode::BAD_GATEWAY,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::NotFound(_) => "printer_not_found",
            ApiError::Decode(_) => "decode_error",
            ApiError::UnsupportedMedia(_) => "unsupported_media_type",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::Connection(_) => "printer_unreachable",
            ApiError::Timeout(_) => "printer_timeout",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            ApiError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                "Internal server error".to_string()
            }
            other => {
                warn!(status = status.as_u16(), code, error = %other, "Request failed");
                other.to_string()
            }
        };

        let body = Json(ErrorBody {
            ok: false,
            error: code,
            message,
        });

        (status, body).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::InvalidCommand(msg) => ApiError::Validation(msg),
            RelayError::Image(msg) => ApiError::Decode(msg),
            RelayError::Connection(msg) => ApiError::Connection(format!("Printer unreachable: {}", msg)),
            RelayError::Timeout(msg) => ApiError::Timeout(format!("Printer timed out: {}", msg)),
            RelayError::Config(msg) | RelayError::Server(msg) => ApiError::Internal(msg),
            RelayError::Io(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<RawError> for ApiError {
    fn from(e: RawError) -> Self {
        match e {
            RawError::Invalid(msg) => ApiError::Validation(msg),
            RawError::Decode(msg) => ApiError::Decode(msg),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!("Upload too large: {}", e.body_text()))
        } else {
            ApiError::BadRequest(format!("Multipart error: {}", e.body_text()))
        }
    }
}
