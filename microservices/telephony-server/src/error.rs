//! Error types for the Telephony Server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use callbridge_core::MissingField;
use serde_json::json;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Telephony Server error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required call request field absent. Reported as 404 for compatibility
    /// with existing clients.
    #[error("{0}")]
    MissingField(#[from] MissingField),

    #[error("Invalid callback parameters: {0}")]
    InvalidCallback(String),

    #[error("Invalid call payload: {0}")]
    InvalidPayload(String),

    #[error("Tunnels unavailable: {0}")]
    TunnelsUnavailable(String),

    #[error("Twilio error: {0}")]
    Twilio(#[from] callbridge_twilio_sdk::TwilioError),

    #[error("Store error: {0}")]
    Store(#[from] callbridge_kv::KvError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_) => StatusCode::NOT_FOUND,
            Error::InvalidCallback(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidPayload(_)
            | Error::TunnelsUnavailable(_)
            | Error::Twilio(_)
            | Error::Store(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Handlers log failures with call context; the client only sees the status
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "detail": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_maps_to_404() {
        let err = Error::from(MissingField::AgentId);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Agent not provided");
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let response = Error::TunnelsUnavailable("ngrok down".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
