//! List Error Types
//!
//! Local query mistakes are `Validation` errors and never reach the server.
//! Remote failures keep the kernel error they arrived as.

use std::time::Duration;

use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type ListResult<T> = Result<T, ListError>;

#[derive(Debug, Error)]
pub enum ListError {
    #[error("Unknown filter '{name}' for {resource}")]
    UnknownFilter { resource: &'static str, name: String },

    #[error("Unknown sort key '{key}' for {resource}")]
    UnknownSortKey { resource: &'static str, key: String },

    #[error("{resource} cannot be searched")]
    SearchUnsupported { resource: &'static str },

    #[error("Page must be 1 or greater")]
    InvalidPage,

    #[error("Page size must be between 1 and {max}")]
    InvalidPageSize { max: u32 },

    /// Filter value rejected by a typed helper
    #[error("{0}")]
    InvalidValue(String),

    /// Fetch failed on the server or in transport
    #[error("{0}")]
    Remote(#[from] AppError),

    /// Client-side fetch timeout
    #[error("The list request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl ListError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ListError::Remote(e) => e.kind(),
            ListError::Timeout(_) => ErrorKind::Network,
            _ => ErrorKind::Validation,
        }
    }

    /// Convert to AppError, keeping the server message and status
    pub fn to_app_error(&self) -> AppError {
        match self {
            ListError::Remote(e) => {
                let app = AppError::new(e.kind(), e.message().to_string());
                match e.status() {
                    Some(status) => app.with_status(status),
                    None => app,
                }
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    pub(crate) fn log(&self, resource: &'static str) {
        match self.kind() {
            ErrorKind::Server => tracing::error!(resource, error = %self, "List fetch failed"),
            ErrorKind::Validation => tracing::debug!(resource, error = %self, "List query rejected"),
            _ => tracing::warn!(resource, error = %self, "List fetch failed"),
        }
    }

    pub(crate) fn log_write(&self, resource: &'static str) {
        match self.kind() {
            ErrorKind::Server => tracing::error!(resource, error = %self, "List write failed"),
            ErrorKind::Validation => tracing::debug!(resource, error = %self, "List write rejected"),
            _ => tracing::warn!(resource, error = %self, "List write failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ListError::InvalidPage.kind(), ErrorKind::Validation);
        assert_eq!(
            ListError::Timeout(Duration::from_secs(15)).kind(),
            ErrorKind::Network
        );
        assert_eq!(
            ListError::from(AppError::from_status(401, None)).kind(),
            ErrorKind::Auth
        );
    }

    #[test]
    fn test_to_app_error_keeps_server_message() {
        let err = ListError::from(AppError::from_status(500, Some("Mongo down".into())));
        let app = err.to_app_error();
        assert_eq!(app.kind(), ErrorKind::Server);
        assert_eq!(app.message(), "Mongo down");
        assert_eq!(app.status(), Some(500));
    }

    #[test]
    fn test_timeout_message() {
        let err = ListError::Timeout(Duration::from_secs(15));
        assert_eq!(err.to_string(), "The list request timed out after 15s");
    }
}
