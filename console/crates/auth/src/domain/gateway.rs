//! Gateway Trait
//!
//! Interface to the remote auth API. Implementation is in the infra layer.

use chrono::{DateTime, Utc};
use platform::secret::SecretString;

use crate::domain::entity::profile::Profile;
use crate::domain::value_object::{email::Email, new_password::NewPassword, otp_code::OtpCode};
use crate::error::AuthResult;

/// Successful sign-in
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub profile: Profile,
    pub token: SecretString,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Successful OTP verification
#[derive(Debug, Clone)]
pub struct OtpVerification {
    pub reset_token: SecretString,
    pub expires_in_minutes: u32,
}

/// Auth API gateway trait
///
/// Implementations map transport failures into endpoint-specific
/// [`crate::error::AuthError`] variants.
#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// `POST /api/auth/login`
    async fn login(&self, username: &str, password: &SecretString) -> AuthResult<LoginGrant>;

    /// `GET /api/auth/me`
    async fn current_user(&self, token: &SecretString) -> AuthResult<Profile>;

    /// `POST /api/auth/logout`
    async fn logout(&self, token: &SecretString) -> AuthResult<()>;

    /// `POST /api/auth/forgot-password`
    async fn request_otp(&self, email: &Email) -> AuthResult<()>;

    /// `POST /api/auth/verify-otp`
    async fn verify_otp(&self, email: &Email, code: &OtpCode) -> AuthResult<OtpVerification>;

    /// `POST /api/auth/reset-password`
    async fn reset_password(
        &self,
        reset_token: &SecretString,
        password: &NewPassword,
    ) -> AuthResult<()>;
}
