use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use lectio_auth::AuthError;
use lectio_core::error::json_error;

/// API error variants. Every credential or token problem is
/// `AuthenticationFailed`; the reason is only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("not the owner of this resource")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("journal entry not found")]
    EntryNotFound,
    #[error("e-mail address already in use")]
    EmailInUse,
    #[error("invalid e-mail address")]
    InvalidEmail,
    #[error("password must be at least 6 characters")]
    PasswordTooShort,
    #[error("missing data")]
    MissingData,
    #[error("limit must be between 1 and 100")]
    InvalidPagination,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::EntryNotFound => "ENTRY_NOT_FOUND",
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Self::MissingData => "MISSING_DATA",
            Self::InvalidPagination => "INVALID_PAGINATION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::EntryNotFound => StatusCode::NOT_FOUND,
            Self::EmailInUse => StatusCode::CONFLICT,
            Self::InvalidEmail
            | Self::PasswordTooShort
            | Self::MissingData
            | Self::InvalidPagination => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed => Self::AuthenticationFailed,
            AuthError::Internal(e) => Self::Internal(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        json_error(self.status(), self.kind(), &self.to_string())
    }
}
