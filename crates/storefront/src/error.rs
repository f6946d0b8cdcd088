//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use vitrine_core::{GatewayError, ValidationError};

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::editor::DraftError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Persistence gateway failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Form input was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Editor session operation failed.
    #[error("Editor error: {0}")]
    Draft(#[from] DraftError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Write rejected by a uniqueness rule.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

const INTERNAL: &str = "Internal server error";

fn gateway_status(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::NotFound => StatusCode::NOT_FOUND,
        GatewayError::Conflict(_) => StatusCode::CONFLICT,
        GatewayError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn gateway_message(err: &GatewayError) -> String {
    match err {
        GatewayError::NotFound => "Not found".to_string(),
        GatewayError::Conflict(msg) => msg.clone(),
        GatewayError::Backend(_) => INTERNAL.to_string(),
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Gateway(err) | Self::Draft(DraftError::Gateway(err)) => gateway_status(err),
            Self::Validation(_) | Self::Draft(DraftError::Validation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Draft(DraftError::SlugUnavailable | DraftError::Busy) => StatusCode::CONFLICT,
            Self::Draft(DraftError::SessionClosed) => StatusCode::GONE,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Message safe to show the client.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::NotFound) => "Not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) | Self::Conflict(msg) => msg.clone(),
            Self::Database(_) | Self::Internal(_) => INTERNAL.to_string(),
            Self::Gateway(err) | Self::Draft(DraftError::Gateway(err)) => gateway_message(err),
            Self::Validation(err) | Self::Draft(DraftError::Validation(err)) => err.to_string(),
            Self::Draft(err) => err.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    "Invalid credentials".to_string()
                }
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash => INTERNAL.to_string(),
            },
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::RateLimited => "Too many requests".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = Json(json!({ "error": self.public_message() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for editor actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("vitrine".to_string());
        assert_eq!(err.to_string(), "Not found: vitrine");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::RateLimited),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_editor_error_status_codes() {
        assert_eq!(
            get_status(DraftError::Busy.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(DraftError::SessionClosed.into()),
            StatusCode::GONE
        );
        assert_eq!(
            get_status(DraftError::SlugUnavailable.into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(DraftError::Validation(ValidationError::EmptyProductName).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(DraftError::Gateway(GatewayError::Conflict("slug".to_string())).into()),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(DraftError::Gateway(GatewayError::NotFound).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(DraftError::Gateway(GatewayError::Backend("down".to_string())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_backend_details_hidden() {
        let err = AppError::Gateway(GatewayError::Backend("connection refused".to_string()));
        assert_eq!(err.public_message(), INTERNAL);
        let err = AppError::Gateway(GatewayError::Conflict("slug already taken".to_string()));
        assert_eq!(err.public_message(), "slug already taken");
    }
}
