//! New Password Value Object
//!
//! A password chosen on the reset screen, checked against its confirmation
//! and the length policy before it leaves the client.

use std::fmt;

use platform::password::{ClearTextPassword, PasswordPolicy};

use crate::error::{AuthError, AuthResult};

/// Validated new password
pub struct NewPassword(ClearTextPassword);

impl NewPassword {
    /// Validate `password` against `confirmation` and the policy
    ///
    /// The policy is checked first so a too-short password reports its length
    /// problem rather than a mismatch.
    pub fn new(password: &str, confirmation: &str, policy: &PasswordPolicy) -> AuthResult<Self> {
        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let validated = ClearTextPassword::with_policy(password.to_string(), policy)?;

        if password != confirmation {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }

        Ok(Self(validated))
    }

    /// Normalized password for transmission
    pub fn expose(&self) -> &str {
        self.0.expose()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NewPassword").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> PasswordPolicy {
        PasswordPolicy::default()
    }

    #[test]
    fn test_matching_password() {
        let pw = NewPassword::new("Str0ng-pass", "Str0ng-pass", &policy()).unwrap();
        assert_eq!(pw.expose(), "Str0ng-pass");
    }

    #[test]
    fn test_mismatch() {
        let err = NewPassword::new("Str0ng-pass", "Str0ng-pasz", &policy()).unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_too_short_reported_before_mismatch() {
        let err = NewPassword::new("short", "other", &policy()).unwrap_err();
        assert!(err.to_string().contains("at least 8"));
    }

    #[test]
    fn test_empty() {
        let err = NewPassword::new("", "", &policy()).unwrap_err();
        assert_eq!(err.to_string(), "Password is required");
    }
}
