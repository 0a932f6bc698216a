//! Reset Capability Entity
//!
//! Short-lived permission to set a new password, granted after OTP
//! verification. Single-use.

use chrono::{DateTime, Duration, Utc};
use platform::secret::SecretString;

use crate::domain::value_object::email::Email;

/// Password reset capability
#[derive(Debug, Clone)]
pub struct ResetCapability {
    pub email: Email,
    pub reset_token: SecretString,
    pub issued_at: DateTime<Utc>,
    pub expires_in_minutes: u32,
}

impl ResetCapability {
    pub fn new(email: Email, reset_token: SecretString, expires_in_minutes: u32) -> Self {
        Self::issued_at(email, reset_token, Utc::now(), expires_in_minutes)
    }

    pub fn issued_at(
        email: Email,
        reset_token: SecretString,
        issued_at: DateTime<Utc>,
        expires_in_minutes: u32,
    ) -> Self {
        Self {
            email,
            reset_token,
            issued_at,
            expires_in_minutes,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::minutes(i64::from(self.expires_in_minutes))
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let issued = Utc::now();
        let cap = ResetCapability::issued_at(
            Email::new("ops@example.com").unwrap(),
            SecretString::from("r"),
            issued,
            15,
        );
        assert!(!cap.is_expired_at(issued + Duration::minutes(14)));
        assert!(cap.is_expired_at(issued + Duration::minutes(15)));
    }

    #[test]
    fn test_debug_hides_token() {
        let cap = ResetCapability::new(
            Email::new("ops@example.com").unwrap(),
            SecretString::from("reset-token-value"),
            10,
        );
        assert!(!format!("{:?}", cap).contains("reset-token-value"));
    }
}
