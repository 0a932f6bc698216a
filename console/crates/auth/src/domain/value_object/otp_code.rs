//! OTP Code Value Object

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use platform::secret::SecretString;

/// Default OTP length sent by the server
pub const OTP_LENGTH: usize = 6;

/// Complete one-time password: exactly `len` ASCII digits
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(SecretString);

impl OtpCode {
    pub fn new(raw: &str, len: usize) -> AppResult<Self> {
        let code = raw.trim();
        if code.is_empty() {
            return Err(AppError::validation("Please enter the verification code"));
        }
        if code.len() != len || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::validation(format!(
                "Please enter all {len} digits of the verification code"
            )));
        }
        Ok(Self(SecretString::from(code)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OtpCode").field(&"[REDACTED]").finish()
    }
}
