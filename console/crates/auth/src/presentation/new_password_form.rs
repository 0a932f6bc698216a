//! New password form view-model
//!
//! Final step of the reset wizard. Validation and submission are delegated
//! to [`PasswordResetFlow::submit_password`]; the form keeps the inline error.

use platform::secret::SecretString;

use crate::application::password_reset::{PasswordResetFlow, ResetStep};
use crate::domain::gateway::AuthGateway;
use crate::error::AuthResult;

#[derive(Debug, Default)]
pub struct NewPasswordForm {
    password: SecretString,
    confirmation: SecretString,
    error: Option<String>,
}

impl NewPasswordForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_password(&mut self, value: impl Into<SecretString>) {
        self.password = value.into();
        self.error = None;
    }

    pub fn set_confirmation(&mut self, value: impl Into<SecretString>) {
        self.confirmation = value.into();
        self.error = None;
    }

    /// Whether both fields hold the same non-empty value
    pub fn matches(&self) -> bool {
        !self.password.is_empty() && self.password == self.confirmation
    }

    /// Submit through the reset flow
    ///
    /// Fields are wiped on success or when the flow restarts at the email step.
    pub async fn submit<G>(&mut self, flow: &mut PasswordResetFlow<G>) -> AuthResult<()>
    where
        G: AuthGateway,
    {
        let result = flow
            .submit_password(self.password.expose(), self.confirmation.expose())
            .await;
        match &result {
            Ok(()) => {
                self.wipe();
                self.error = None;
            }
            Err(e) => {
                if flow.step() == ResetStep::CollectingEmail {
                    self.wipe();
                }
                self.error = Some(e.to_string());
            }
        }
        result
    }

    fn wipe(&mut self) {
        self.password = SecretString::default();
        self.confirmation = SecretString::default();
    }
}
