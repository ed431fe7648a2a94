// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Error type for every authentication-service operation
///
/// All failures collapse to a uniform `{success: false, message}` envelope;
/// validation failures additionally carry field-level detail.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Request validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("User details already exists")]
    DuplicateUser,

    #[error("Invalid Credentials")]
    InvalidCredentials,

    /// Correct credentials but the account is not an admin
    #[error("Unauthorized")]
    AdminOnly,

    #[error("No Refresh token in Cookie")]
    MissingRefreshCookie,

    #[error("No user id for this refresh token")]
    UnknownRefreshUser,

    #[error("Your current password is incorrect")]
    IncorrectCurrentPassword,

    #[error("Invalid token or email provided, please try again")]
    InvalidResetToken,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User with id {0} not found")]
    UserNotFound(i32),

    #[error("Password hashing error")]
    PasswordHashError,

    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Unexpected failure on the reset-password path; the underlying
    /// message is echoed to the client as a 500
    #[error("{0}")]
    Internal(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl AuthError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            // The observed wire behavior for duplicate registrations is 403
            AuthError::DuplicateUser => StatusCode::FORBIDDEN,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::AdminOnly => StatusCode::FORBIDDEN,
            AuthError::MissingRefreshCookie => StatusCode::UNAUTHORIZED,
            AuthError::UnknownRefreshUser => StatusCode::UNAUTHORIZED,
            AuthError::IncorrectCurrentPassword => StatusCode::UNAUTHORIZED,
            AuthError::InvalidResetToken => StatusCode::BAD_REQUEST,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message (sensitive detail filtered for 500s outside
    /// the reset-password catch-all)
    pub fn client_message(&self) -> String {
        match self {
            AuthError::PasswordHashError | AuthError::DatabaseError(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::Validation(errors) => {
                warn!("Auth request validation failed: {}", errors);
            }
            AuthError::DatabaseError(msg) => {
                error!("Database error in auth: {}", msg);
            }
            AuthError::PasswordHashError => {
                error!("Password hashing error");
            }
            AuthError::Internal(msg) => {
                error!("Unexpected error in reset-password: {}", msg);
            }
            other => {
                warn!("Auth failure: {}", other);
            }
        }

        let status = self.status_code();
        let body = match &self {
            AuthError::Validation(errors) => Json(json!({
                "success": false,
                "message": self.client_message(),
                "errors": errors,
            })),
            _ => Json(json!({
                "success": false,
                "message": self.client_message(),
            })),
        };

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_error_taxonomy() {
        assert_eq!(AuthError::DuplicateUser.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::AdminOnly.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::MissingRefreshCookie.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidResetToken.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_exact_wire_messages() {
        assert_eq!(
            AuthError::DuplicateUser.client_message(),
            "User details already exists"
        );
        assert_eq!(
            AuthError::InvalidCredentials.client_message(),
            "Invalid Credentials"
        );
        assert_eq!(AuthError::AdminOnly.client_message(), "Unauthorized");
        assert_eq!(
            AuthError::MissingRefreshCookie.client_message(),
            "No Refresh token in Cookie"
        );
        assert_eq!(
            AuthError::UnknownRefreshUser.client_message(),
            "No user id for this refresh token"
        );
        assert_eq!(
            AuthError::IncorrectCurrentPassword.client_message(),
            "Your current password is incorrect"
        );
        assert_eq!(
            AuthError::InvalidResetToken.client_message(),
            "Invalid token or email provided, please try again"
        );
    }

    #[test]
    fn test_internal_errors_hide_detail_except_reset_path() {
        assert_eq!(
            AuthError::DatabaseError("connection refused".into()).client_message(),
            "Internal server error"
        );
        // The reset-password catch-all deliberately echoes the cause
        assert_eq!(
            AuthError::Internal("row deserialization failed".into()).client_message(),
            "row deserialization failed"
        );
    }
}
