//! Login form view-model
//!
//! Field values survive a failed attempt; only the password is cleared after
//! a successful sign-in. Typing in either field clears the inline error.

use std::sync::Arc;

use platform::secret::SecretString;

use crate::application::session_controller::SessionController;
use crate::domain::entity::profile::Profile;
use crate::domain::gateway::AuthGateway;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
pub struct LoginForm {
    username: String,
    password: SecretString,
    error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// Inline error shown above the form
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_username(&mut self, value: impl Into<String>) {
        self.username = value.into();
        self.error = None;
    }

    pub fn set_password(&mut self, value: impl Into<SecretString>) {
        self.password = value.into();
        self.error = None;
    }

    fn validate(&self) -> AuthResult<()> {
        if self.username.trim().is_empty() {
            return Err(AuthError::Validation("Username is required".into()));
        }
        if self.password.is_empty() {
            return Err(AuthError::Validation("Password is required".into()));
        }
        Ok(())
    }

    /// Validate locally, then sign in through the controller
    pub async fn submit<G>(&mut self, controller: &SessionController<G>) -> AuthResult<Arc<Profile>>
    where
        G: AuthGateway,
    {
        if let Err(e) = self.validate() {
            self.error = Some(e.to_string());
            return Err(e);
        }

        self.submitting = true;
        let result = controller.login(&self.username, &self.password).await;
        self.submitting = false;

        match result {
            Ok(profile) => {
                self.error = None;
                self.password = SecretString::default();
                Ok(profile)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::AuthConfig;
    use crate::application::credential_store::CredentialStore;
    use crate::application::session_controller::tests::{FakeGateway, grant};
    use crate::domain::entity::session::SessionStatus;
    use kernel::role::UserRole;
    use platform::cookie::MemoryCookieJar;
    use platform::storage::MemoryStore;

    fn controller() -> (Arc<FakeGateway>, SessionController<FakeGateway>) {
        let gateway = Arc::new(FakeGateway::default());
        let config = Arc::new(AuthConfig::development());
        let store = Arc::new(CredentialStore::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryCookieJar::new()),
            config.clone(),
        ));
        (
            gateway.clone(),
            SessionController::new(gateway, store, config),
        )
    }

    #[tokio::test]
    async fn test_wrong_password_keeps_values_and_sets_one_error() {
        let (gateway, controller) = controller();
        gateway
            .logins
            .lock()
            .push_back(Err(AuthError::InvalidCredentials));

        let mut form = LoginForm::new();
        form.set_username("ops");
        form.set_password("wrong");
        let err = form.submit(&controller).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert_eq!(form.username(), "ops");
        assert_eq!(form.password().expose(), "wrong");
        assert_eq!(
            form.error(),
            Some(AuthError::InvalidCredentials.to_string().as_str())
        );
        assert!(!form.is_submitting());
        assert_eq!(controller.snapshot().status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_later_success_clears_error() {
        let (gateway, controller) = controller();
        {
            let mut logins = gateway.logins.lock();
            logins.push_back(Err(AuthError::InvalidCredentials));
            logins.push_back(Ok(grant("ops", UserRole::Admin)));
        }

        let mut form = LoginForm::new();
        form.set_username("ops");
        form.set_password("wrong");
        let _ = form.submit(&controller).await;
        assert!(form.error().is_some());

        form.set_password("right");
        assert!(form.error().is_none());
        let profile = form.submit(&controller).await.unwrap();

        assert_eq!(profile.username, "ops");
        assert!(form.error().is_none());
        assert!(form.password().is_empty());
        assert_eq!(form.username(), "ops");
    }

    #[tokio::test]
    async fn test_empty_fields_never_reach_server() {
        let (gateway, controller) = controller();
        let mut form = LoginForm::new();
        form.set_password("secret");

        let err = form.submit(&controller).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(form.error(), Some("Username is required"));

        form.set_username("ops");
        form.set_password("");
        let _ = form.submit(&controller).await;
        assert_eq!(form.error(), Some("Password is required"));
        assert!(gateway.calls().is_empty());
    }

    #[test]
    fn test_typing_clears_error() {
        let mut form = LoginForm::new();
        form.error = Some("Invalid username or password".into());
        form.set_username("o");
        assert!(form.error().is_none());
    }
}
