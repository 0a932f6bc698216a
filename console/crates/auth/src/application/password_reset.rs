//! Password Reset Flow
//!
//! Three-step wizard: email, OTP code, new password.
//!
//! ```text
//! collecting_email --request_otp--> otp_sent --verify_otp--> password_collected --submit--> done
//!        ^                                                          |
//!        +---------------- reset token rejected / expired ----------+
//! any non-terminal --cancel--> cancelled
//! ```
//!
//! The reset capability obtained from OTP verification is mirrored to the
//! credential store and erased on cancel, success and terminal rejection.

use std::sync::Arc;

use derive_more::Display;
use tracing::{debug, info, warn};

use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::domain::entity::reset_capability::ResetCapability;
use crate::domain::gateway::AuthGateway;
use crate::domain::value_object::{email::Email, new_password::NewPassword, otp_code::OtpCode};
use crate::error::{AuthError, AuthResult};

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResetStep {
    #[display("collecting_email")]
    CollectingEmail,
    #[display("otp_sent")]
    OtpSent,
    #[display("password_collected")]
    PasswordCollected,
    #[display("done")]
    Done,
    #[display("cancelled")]
    Cancelled,
}

impl ResetStep {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResetStep::Done | ResetStep::Cancelled)
    }
}

/// Password reset wizard
pub struct PasswordResetFlow<G>
where
    G: AuthGateway,
{
    gateway: Arc<G>,
    store: Arc<CredentialStore>,
    config: Arc<AuthConfig>,
    step: ResetStep,
    email: Option<Email>,
    capability: Option<ResetCapability>,
    error: Option<String>,
}

impl<G> PasswordResetFlow<G>
where
    G: AuthGateway,
{
    pub fn new(gateway: Arc<G>, store: Arc<CredentialStore>, config: Arc<AuthConfig>) -> Self {
        Self {
            gateway,
            store,
            config,
            step: ResetStep::CollectingEmail,
            email: None,
            capability: None,
            error: None,
        }
    }

    /// Resume at the password step from a persisted capability
    ///
    /// An expired capability is erased and the wizard starts over with the
    /// email prefilled.
    pub fn resume(gateway: Arc<G>, store: Arc<CredentialStore>, config: Arc<AuthConfig>) -> Self {
        let persisted = store.load_reset_token();
        let mut flow = Self::new(gateway, store, config);
        if let Some(capability) = persisted {
            flow.email = Some(capability.email.clone());
            if capability.is_expired() {
                flow.store.clear_reset_token();
                flow.error = Some(AuthError::ResetTokenInvalid.to_string());
            } else {
                flow.capability = Some(capability);
                flow.step = ResetStep::PasswordCollected;
            }
        }
        flow
    }

    pub fn step(&self) -> ResetStep {
        self.step
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    /// Inline error shown on the current step
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_capability(&self) -> bool {
        self.capability.is_some()
    }

    /// Send an OTP to `email`
    pub async fn request_otp(&mut self, email: &str) -> AuthResult<()> {
        self.ensure_open()?;
        let email = match Email::new(email) {
            Ok(email) => email,
            Err(e) => return self.fail(e.into()),
        };

        if let Err(e) = self.gateway.request_otp(&email).await {
            return self.fail(e);
        }

        self.erase_capability();
        info!(domain = %email.domain(), "Password reset code requested");
        self.email = Some(email);
        self.step = ResetStep::OtpSent;
        self.error = None;
        Ok(())
    }

    /// Send the OTP again to the same address
    pub async fn resend_otp(&mut self) -> AuthResult<()> {
        self.ensure_open()?;
        let Some(email) = self.email.clone().filter(|_| self.step == ResetStep::OtpSent) else {
            return self.fail(AuthError::Validation(
                "Request a verification code first".to_string(),
            ));
        };

        if let Err(e) = self.gateway.request_otp(&email).await {
            return self.fail(e);
        }
        debug!("Password reset code resent");
        self.error = None;
        Ok(())
    }

    /// Verify the OTP and obtain the reset capability
    pub async fn verify_otp(&mut self, code: &str) -> AuthResult<()> {
        self.ensure_open()?;
        let Some(email) = self.email.clone().filter(|_| self.step == ResetStep::OtpSent) else {
            return self.fail(AuthError::Validation(
                "Request a verification code first".to_string(),
            ));
        };
        let code = match OtpCode::new(code, self.config.otp_length) {
            Ok(code) => code,
            Err(e) => return self.fail(e.into()),
        };

        let verification = match self.gateway.verify_otp(&email, &code).await {
            Ok(verification) => verification,
            Err(e) => return self.fail(e),
        };

        let capability = ResetCapability::new(
            email,
            verification.reset_token,
            verification.expires_in_minutes,
        );
        if let Err(e) = self.store.save_reset_token(&capability) {
            warn!(error = %e, "Reset capability not persisted");
        }
        self.capability = Some(capability);
        self.step = ResetStep::PasswordCollected;
        self.error = None;
        debug!("Password reset code verified");
        Ok(())
    }

    /// Submit the new password
    ///
    /// Rejected locally without a server call unless an OTP was verified.
    pub async fn submit_password(&mut self, password: &str, confirmation: &str) -> AuthResult<()> {
        self.ensure_open()?;
        let Some(capability) = self
            .capability
            .as_ref()
            .filter(|_| self.step == ResetStep::PasswordCollected)
        else {
            return self.fail(AuthError::ResetNotVerified);
        };

        let expired = capability.is_expired();
        let reset_token = capability.reset_token.clone();
        if expired {
            return self.restart(AuthError::ResetTokenInvalid);
        }

        let password = match NewPassword::new(password, confirmation, &self.config.password_policy())
        {
            Ok(password) => password,
            Err(e) => return self.fail(e),
        };

        match self.gateway.reset_password(&reset_token, &password).await {
            Ok(()) => {
                self.erase_capability();
                self.step = ResetStep::Done;
                self.error = None;
                info!("Password reset completed");
                Ok(())
            }
            Err(e) if e.is_terminal_for_reset() => self.restart(e),
            Err(e) => self.fail(e),
        }
    }

    /// Abandon the wizard
    pub fn cancel(&mut self) {
        if self.step.is_terminal() {
            return;
        }
        self.erase_capability();
        self.step = ResetStep::Cancelled;
        self.error = None;
        debug!("Password reset cancelled");
    }

    fn ensure_open(&self) -> AuthResult<()> {
        if self.step.is_terminal() {
            return Err(AuthError::ResetClosed);
        }
        Ok(())
    }

    fn fail<T>(&mut self, err: AuthError) -> AuthResult<T> {
        err.log();
        self.error = Some(err.to_string());
        Err(err)
    }

    /// Terminal rejection: back to the email step with the email kept
    fn restart<T>(&mut self, err: AuthError) -> AuthResult<T> {
        warn!(error = %err, "Reset capability rejected");
        self.erase_capability();
        self.step = ResetStep::CollectingEmail;
        self.fail(err)
    }

    fn erase_capability(&mut self) {
        self.capability = None;
        self.store.clear_reset_token();
    }
}
