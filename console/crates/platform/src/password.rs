//! Password Policy
//!
//! NIST SP 800-63B length and character rules applied to new passwords
//! before they are sent to the server:
//! - Unicode NFKC normalization before validation
//! - Length counted in code points (8..=128)
//! - No control characters
//! - Zeroization of the clear text on drop

use std::fmt;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants (NIST SP 800-63B compliant)
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be at least {min} characters long")]
    TooShort { min: usize, actual: usize },

    /// Password is too long
    #[error("Password must be at most {max} characters long")]
    TooLong { max: usize, actual: usize },

    /// Password contains only whitespace
    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    /// Password contains invalid characters (control characters)
    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

// ============================================================================
// Length policy
// ============================================================================

/// Inclusive length bounds for new passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            max_length: MAX_PASSWORD_LENGTH,
        }
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("my_secure_password".to_string()).unwrap();
/// assert_eq!(password.expose(), "my_secure_password");
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password validated against the default policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        Self::with_policy(raw, &PasswordPolicy::default())
    }

    /// Create a new clear text password with explicit length bounds
    ///
    /// Unicode is normalized using NFKC before validation.
    pub fn with_policy(raw: String, policy: &PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        let mut raw = raw;
        // NIST: Unicode NFKC normalization before processing
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        let candidate = Self(normalized);

        if candidate.0.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // NIST: Count Unicode code points (not bytes)
        let char_count = candidate.0.chars().count();

        if char_count < policy.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: policy.min_length,
                actual: char_count,
            });
        }

        if char_count > policy.max_length {
            return Err(PasswordPolicyError::TooLong {
                max: policy.max_length,
                actual: char_count,
            });
        }

        // Control characters other than space / tab are rejected
        if candidate
            .0
            .chars()
            .any(|ch| ch.is_control() && ch != ' ' && ch != '\t')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(candidate)
    }

    /// Borrow the normalized password for transmission
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
