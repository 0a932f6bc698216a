//! Error conversions - From implementations for common error types
//!
//! Provides automatic conversion from common error types to [`AppError`].

use super::app_error::AppError;
#[cfg(feature = "reqwest")]
use super::kind::ErrorKind;

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        // クライアント側では JSON の失敗はサーバーの不正なレスポンスを意味する
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::server(format!("Unexpected response format: {}", err)).with_source(err)
        } else {
            AppError::server("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// reqwest conversions (feature-gated)
// ============================================================================

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return AppError::network("The server took too long to respond").with_source(err);
        }
        if err.is_connect() {
            return AppError::from_kind(ErrorKind::Network).with_source(err);
        }
        if let Some(status) = err.status() {
            return AppError::from_status(status.as_u16(), None).with_source(err);
        }
        if err.is_decode() {
            return AppError::server("Unexpected response format").with_source(err);
        }
        if err.is_builder() {
            return AppError::bad_request("Invalid request").with_source(err);
        }
        AppError::from_kind(ErrorKind::Network).with_source(err)
    }
}
