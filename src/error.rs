//! Error types for the inventory console

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::models::session::LOGIN_ROUTE;

/// Field name -> messages, as returned by the remote API on validation failures
pub type FieldErrors = IndexMap<String, Vec<String>>;

/// Stable error codes exposed to the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    BadValue = 3,
    NoSuchData = 4,
    UpstreamFailure = 5,
    NetworkFailure = 6,
    StorageFailure = 7,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    FieldErrors(FieldErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// One user-facing message per line, ready to be shown as notifications
    pub notifications: Vec<String>,
    /// Route the dashboard should navigate to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::FieldErrors(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { status, .. } => match StatusCode::from_u16(*status) {
                Ok(code) if code.is_client_error() => code,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            AppError::Authentication(_) => ErrorCode::NotAuthorized,
            AppError::Validation(_) | AppError::FieldErrors(_) | AppError::BadRequest(_) => {
                ErrorCode::BadValue
            }
            AppError::NotFound(_) => ErrorCode::NoSuchData,
            AppError::Upstream { .. } => ErrorCode::UpstreamFailure,
            AppError::Transport(_) => ErrorCode::NetworkFailure,
            AppError::Storage(_) => ErrorCode::StorageFailure,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }

    /// Messages the dashboard shows one toast each for
    pub fn notifications(&self) -> Vec<String> {
        match self {
            AppError::FieldErrors(fields) => fields
                .iter()
                .flat_map(|(field, messages)| {
                    messages.iter().map(move |message| format!("{}: {}", field, message))
                })
                .collect(),
            AppError::Transport(_) => vec!["Network error, please try again".to_string()],
            AppError::Storage(_) | AppError::Internal(_) => {
                vec!["Internal server error".to_string()]
            }
            AppError::Authentication(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Upstream { message: msg, .. } => vec![msg.clone()],
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value ({})", e.code))
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        fields.sort_keys();
        AppError::FieldErrors(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        match &self {
            AppError::Transport(e) => tracing::warn!("Upstream transport error: {}", e),
            AppError::Storage(msg) => tracing::error!("Session storage error: {}", msg),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::Upstream { status, message } if *status >= 500 => {
                tracing::warn!("Upstream failure {}: {}", status, message)
            }
            _ => {}
        }

        let message = match &self {
            AppError::Transport(_) => "Network error".to_string(),
            AppError::Storage(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let redirect = matches!(self, AppError::Authentication(_)).then(|| LOGIN_ROUTE.to_string());

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            notifications: self.notifications(),
            redirect,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_become_one_notification_per_message() {
        let mut fields = FieldErrors::new();
        fields.insert("name".into(), vec!["This field is required.".into()]);
        fields.insert(
            "quantity".into(),
            vec!["Must be positive.".into(), "Must be an integer.".into()],
        );

        let notes = AppError::FieldErrors(fields).notifications();
        assert_eq!(
            notes,
            vec![
                "name: This field is required.",
                "quantity: Must be positive.",
                "quantity: Must be an integer.",
            ]
        );
    }

    #[test]
    fn upstream_server_errors_map_to_bad_gateway() {
        let err = AppError::Upstream { status: 503, message: "down".into() };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let err = AppError::Upstream { status: 409, message: "conflict".into() };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn authentication_errors_are_unauthorized() {
        let err = AppError::Authentication("expired".into());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.notifications(), vec!["expired"]);
    }
}
