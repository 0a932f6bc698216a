//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, PasswordPolicy};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

use crate::domain::value_object::otp_code::OTP_LENGTH;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Storage key for the bearer token (also the cookie name)
    pub token_key: String,
    /// Storage key for the cached profile JSON
    pub profile_key: String,
    /// Storage key for the authenticated marker
    pub marker_key: String,
    /// Storage key for the transient reset capability
    pub reset_token_key: String,
    /// Token cookie lifetime (7 days)
    pub cookie_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Client-side timeout for sign-in and session confirmation
    pub login_timeout: Duration,
    /// Number of OTP digits
    pub otp_length: usize,
    /// New password minimum length
    pub password_min_length: usize,
    /// New password maximum length
    pub password_max_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_key: "authToken".to_string(),
            profile_key: "user".to_string(),
            marker_key: "isAuthenticated".to_string(),
            reset_token_key: "resetToken".to_string(),
            cookie_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            login_timeout: Duration::from_secs(15),
            otp_length: OTP_LENGTH,
            password_min_length: MIN_PASSWORD_LENGTH,
            password_max_length: MAX_PASSWORD_LENGTH,
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Cookie attributes for the token copy
    pub fn token_cookie(&self) -> CookieConfig {
        CookieConfig {
            secure: self.cookie_secure,
            same_site: self.cookie_same_site,
            ..CookieConfig::persistent(self.token_key.clone(), self.cookie_ttl)
        }
    }

    /// Length policy for new passwords
    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_length: self.password_min_length,
            max_length: self.password_max_length,
        }
    }
}
