//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Each variant carries
//! its own user-facing message so the login, OTP and reset screens can show
//! them inline.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::storage::StorageError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Form input rejected before any request is sent
    #[error("{0}")]
    Validation(String),

    /// Wrong username or password (401)
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Account exists but is deactivated (403)
    #[error("Your account is inactive. Please contact an administrator")]
    AccountInactive,

    /// Too many attempts (429)
    #[error("Too many attempts. Please wait a moment and try again")]
    RateLimited,

    /// Stored token rejected by the server
    #[error("Your session has expired. Please sign in again")]
    SessionInvalid,

    /// OTP code mismatch or expired
    #[error("The verification code is invalid or has expired")]
    OtpInvalid,

    /// Reset token invalid, expired or already used
    #[error("Your reset session has expired. Please request a new code")]
    ResetTokenInvalid,

    /// Password submitted without a verified OTP
    #[error("Please verify the code sent to your email first")]
    ResetNotVerified,

    /// Reset wizard already finished or cancelled
    #[error("This password reset has ended. Please start again")]
    ResetClosed,

    /// A sign-in request is already in flight
    #[error("Sign-in is already in progress")]
    SignInInProgress,

    /// Sign-in finished after the operator had already signed out
    #[error("Sign-in was cancelled")]
    SignInCancelled,

    /// Server rejected the request with its own message (other 4xx)
    #[error("{0}")]
    Rejected(String),

    /// Server failure (5xx or malformed response)
    #[error("The server encountered an error: {0}")]
    Server(String),

    /// Transport failure or client-side timeout
    #[error("Unable to reach the server: {0}")]
    Network(String),

    /// Local credential storage failure
    #[error("Local storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::ResetNotVerified
            | AuthError::ResetClosed
            | AuthError::SignInInProgress
            | AuthError::SignInCancelled => ErrorKind::Validation,
            AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::SessionInvalid
            | AuthError::OtpInvalid
            | AuthError::ResetTokenInvalid => ErrorKind::Auth,
            AuthError::RateLimited => ErrorKind::RateLimited,
            AuthError::Rejected(_) => ErrorKind::BadRequest,
            AuthError::Server(_) | AuthError::Storage(_) => ErrorKind::Server,
            AuthError::Network(_) => ErrorKind::Network,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Whether the error ends a password reset and requires a new code
    pub fn is_terminal_for_reset(&self) -> bool {
        matches!(self, AuthError::ResetTokenInvalid)
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Server(msg) => {
                tracing::error!(message = %msg, "Auth server error");
            }
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Credential storage error");
            }
            AuthError::Network(msg) => {
                tracing::warn!(message = %msg, "Auth request did not reach the server");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountInactive => {
                tracing::warn!("Login attempt on inactive account");
            }
            AuthError::RateLimited => {
                tracing::warn!("Auth request rate limited");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

/// Generic mapping used when no endpoint-specific mapping applies
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::Validation => AuthError::Validation(err.message().to_string()),
            ErrorKind::Auth => AuthError::SessionInvalid,
            ErrorKind::RateLimited => AuthError::RateLimited,
            ErrorKind::NotFound | ErrorKind::BadRequest => {
                AuthError::Rejected(err.message().to_string())
            }
            ErrorKind::Network => AuthError::Network(err.message().to_string()),
            _ => AuthError::Server(err.message().to_string()),
        }
    }
}

impl From<platform::password::PasswordPolicyError> for AuthError {
    fn from(err: platform::password::PasswordPolicyError) -> Self {
        AuthError::Validation(err.to_string())
    }
}
