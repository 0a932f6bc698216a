//! REST Auth Gateway
//!
//! Calls the `/api/auth/*` endpoints and maps their failures into
//! endpoint-specific [`AuthError`] variants.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, OptionExt, ResultExt};
use kernel::error::kind::ErrorKind;
use platform::client::{ApiClient, envelope_data};
use platform::secret::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::entity::profile::Profile;
use crate::domain::gateway::{AuthGateway, LoginGrant, OtpVerification};
use crate::domain::value_object::{email::Email, new_password::NewPassword, otp_code::OtpCode};
use crate::error::{AuthError, AuthResult};

const LOGIN_PATH: &str = "/api/auth/login";
const ME_PATH: &str = "/api/auth/me";
const LOGOUT_PATH: &str = "/api/auth/logout";
const FORGOT_PASSWORD_PATH: &str = "/api/auth/forgot-password";
const VERIFY_OTP_PATH: &str = "/api/auth/verify-otp";
const RESET_PASSWORD_PATH: &str = "/api/auth/reset-password";

const MALFORMED: &str = "Unexpected auth response format";

/// Reset tokens default to this lifetime when the server omits it
const DEFAULT_RESET_MINUTES: u32 = 15;

/// Auth gateway over the console REST API
#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    client: ApiClient,
}

impl HttpAuthGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl AuthGateway for HttpAuthGateway {
    async fn login(&self, username: &str, password: &SecretString) -> AuthResult<LoginGrant> {
        let body = json!({ "username": username, "password": password.expose() });
        let envelope = self
            .client
            .post(LOGIN_PATH, &body, None)
            .await
            .map_err(map_login_error)?;
        parse_login(envelope)
    }

    async fn current_user(&self, token: &SecretString) -> AuthResult<Profile> {
        let envelope = self
            .client
            .get(ME_PATH, &[], Some(token.expose()))
            .await
            .map_err(map_session_error)?;
        parse_profile(envelope)
    }

    async fn logout(&self, token: &SecretString) -> AuthResult<()> {
        self.client
            .post(LOGOUT_PATH, &json!({}), Some(token.expose()))
            .await
            .map_err(map_session_error)?;
        Ok(())
    }

    async fn request_otp(&self, email: &Email) -> AuthResult<()> {
        self.client
            .post(FORGOT_PASSWORD_PATH, &json!({ "email": email.as_str() }), None)
            .await?;
        Ok(())
    }

    async fn verify_otp(&self, email: &Email, code: &OtpCode) -> AuthResult<OtpVerification> {
        let body = json!({ "email": email.as_str(), "otp_code": code.expose() });
        let envelope = self
            .client
            .post(VERIFY_OTP_PATH, &body, None)
            .await
            .map_err(map_otp_error)?;
        parse_verification(envelope)
    }

    async fn reset_password(
        &self,
        reset_token: &SecretString,
        password: &NewPassword,
    ) -> AuthResult<()> {
        let body = json!({ "token": reset_token.expose(), "new_password": password.expose() });
        self.client
            .post(RESET_PASSWORD_PATH, &body, None)
            .await
            .map_err(map_reset_error)?;
        Ok(())
    }
}

// ============================================================================
// Error mapping
// ============================================================================

/// `/login`: 403 means the account is inactive, any other auth failure is
/// a credential mismatch
pub fn map_login_error(err: AppError) -> AuthError {
    match (err.kind(), err.status()) {
        (ErrorKind::Auth, Some(403)) => AuthError::AccountInactive,
        (ErrorKind::Auth, _) => AuthError::InvalidCredentials,
        _ => err.into(),
    }
}

/// `/me` and `/logout`: an auth failure means the token is no longer valid
pub fn map_session_error(err: AppError) -> AuthError {
    match err.kind() {
        ErrorKind::Auth => AuthError::SessionInvalid,
        _ => err.into(),
    }
}

/// `/verify-otp`
pub fn map_otp_error(err: AppError) -> AuthError {
    match err.kind() {
        ErrorKind::Auth | ErrorKind::BadRequest | ErrorKind::NotFound => AuthError::OtpInvalid,
        _ => err.into(),
    }
}

/// `/reset-password`
pub fn map_reset_error(err: AppError) -> AuthError {
    match err.kind() {
        ErrorKind::Auth | ErrorKind::BadRequest | ErrorKind::NotFound => {
            AuthError::ResetTokenInvalid
        }
        _ => err.into(),
    }
}

// ============================================================================
// Response parsing
// ============================================================================

#[derive(Deserialize)]
struct LoginData {
    user: Profile,
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct VerificationData {
    reset_token: Option<String>,
    expires_in_minutes: Option<u32>,
}

/// Parse `{success, data: {user, token, expires_at}}`
pub fn parse_login(envelope: Value) -> AuthResult<LoginGrant> {
    let data: LoginData = serde_json::from_value(envelope_data(envelope))
        .map_app_err(ErrorKind::Server, MALFORMED)?;
    let token = Some(data.token)
        .filter(|token| !token.trim().is_empty())
        .ok_or_malformed("Login response carried no token")?;
    Ok(LoginGrant {
        profile: data.user,
        token: SecretString::from(token),
        expires_at: data.expires_at,
    })
}

/// Parse `{success, data: user}`
pub fn parse_profile(envelope: Value) -> AuthResult<Profile> {
    let data = envelope_data(envelope);
    // some deployments nest the profile under `user`
    let data = match data {
        Value::Object(mut map) if map.contains_key("user") => {
            map.remove("user").unwrap_or(Value::Null)
        }
        other => other,
    };
    Ok(serde_json::from_value(data).map_app_err(ErrorKind::Server, MALFORMED)?)
}

/// Parse the verification result, at the top level or under `data`
pub fn parse_verification(envelope: Value) -> AuthResult<OtpVerification> {
    let top: VerificationData =
        serde_json::from_value(envelope.clone()).map_app_err(ErrorKind::Server, MALFORMED)?;
    let data = match top.reset_token {
        Some(_) => top,
        None => serde_json::from_value(envelope_data(envelope))
            .map_app_err(ErrorKind::Server, MALFORMED)?,
    };

    let reset_token = data
        .reset_token
        .filter(|token| !token.trim().is_empty())
        .ok_or_malformed("Verification response carried no reset token")?;
    Ok(OtpVerification {
        reset_token: SecretString::from(reset_token),
        expires_in_minutes: data.expires_in_minutes.unwrap_or(DEFAULT_RESET_MINUTES),
    })
}
