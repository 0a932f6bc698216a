//! App shell
//!
//! Owns the current location and applies route decisions. It is the only
//! subscriber of session events: a forced sign-out is the one automatic
//! navigation to the login screen.

use std::sync::Arc;

use auth::application::route_guard::{LOGIN_PATH, RouteDecision};
use auth::domain::gateway::AuthGateway;
use auth::{RouteTable, SessionController, SessionEvent};
use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Where the shell currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A view is rendered at this path
    At(String),
    /// Waiting for session confirmation before rendering this path
    Pending(String),
}

impl Location {
    pub fn path(&self) -> &str {
        match self {
            Location::At(path) | Location::Pending(path) => path,
        }
    }
}

pub struct AppShell<G>
where
    G: AuthGateway,
{
    session: Arc<SessionController<G>>,
    routes: RouteTable,
    location: Mutex<Location>,
}

impl<G> AppShell<G>
where
    G: AuthGateway + Send + Sync + 'static,
{
    pub fn new(session: Arc<SessionController<G>>) -> Self {
        Self {
            session,
            routes: RouteTable::console(),
            location: Mutex::new(Location::Pending("/".to_string())),
        }
    }

    pub fn location(&self) -> Location {
        self.location.lock().clone()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Navigate to `path`, following guard redirects
    pub fn navigate(&self, path: &str) -> Location {
        let decision = self.routes.decide(&self.session.snapshot(), path);
        let next = match decision {
            RouteDecision::Render => Location::At(path.to_string()),
            RouteDecision::Pending => Location::Pending(path.to_string()),
            RouteDecision::RedirectLogin => Location::At(LOGIN_PATH.to_string()),
            RouteDecision::RedirectHome(home) => Location::At(home.to_string()),
        };
        debug!(requested = path, ?decision, location = next.path(), "Route resolved");
        *self.location.lock() = next.clone();
        next
    }

    /// Re-run the guard for a pending location
    pub fn settle(&self) -> Location {
        let current = self.location();
        match current {
            Location::Pending(path) => self.navigate(&path),
            at => at,
        }
    }

    /// React to a session event
    pub fn handle_event(&self, event: &SessionEvent) {
        match event {
            SessionEvent::ForcedSignOut { reason } => {
                warn!(reason = %reason, "Session ended by server, returning to sign-in");
                *self.location.lock() = Location::At(LOGIN_PATH.to_string());
            }
            SessionEvent::SignedOut => {
                *self.location.lock() = Location::At(LOGIN_PATH.to_string());
            }
            SessionEvent::SignedIn { username } => {
                info!(username = %username, "Signed in");
            }
        }
    }

    /// Subscribe to session events on a background task
    pub fn spawn_event_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let shell = Arc::clone(self);
        let mut events = self.session.events();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => shell.handle_event(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Session events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::domain::gateway::{LoginGrant, OtpVerification};
    use auth::domain::value_object::{
        email::Email, new_password::NewPassword, otp_code::OtpCode,
    };
    use auth::{AuthConfig, AuthError, AuthResult, CredentialStore, Profile, UserRole};
    use chrono::Utc;
    use kernel::id::UserId;
    use platform::cookie::MemoryCookieJar;
    use platform::secret::SecretString;
    use platform::storage::{KeyValueStore, MemoryStore};
    use std::collections::VecDeque;
    use std::time::Duration;

    #[derive(Default)]
    struct StubGateway {
        profiles: Mutex<VecDeque<AuthResult<Profile>>>,
    }

    impl AuthGateway for StubGateway {
        async fn login(&self, _u: &str, _p: &SecretString) -> AuthResult<LoginGrant> {
            Err(AuthError::InvalidCredentials)
        }

        async fn current_user(&self, _token: &SecretString) -> AuthResult<Profile> {
            let next = self.profiles.lock().pop_front();
            next.unwrap_or(Err(AuthError::SessionInvalid))
        }

        async fn logout(&self, _token: &SecretString) -> AuthResult<()> {
            Ok(())
        }

        async fn request_otp(&self, _email: &Email) -> AuthResult<()> {
            Ok(())
        }

        async fn verify_otp(&self, _e: &Email, _c: &OtpCode) -> AuthResult<OtpVerification> {
            Err(AuthError::OtpInvalid)
        }

        async fn reset_password(&self, _t: &SecretString, _p: &NewPassword) -> AuthResult<()> {
            Ok(())
        }
    }

    fn profile(role: UserRole) -> Profile {
        let now = Utc::now();
        Profile {
            id: UserId::new("u-1"),
            username: "ops".to_string(),
            email: "ops@example.com".to_string(),
            full_name: "Ops".to_string(),
            role,
            is_active: true,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn shell_with_token(gateway: StubGateway) -> Arc<AppShell<StubGateway>> {
        let storage = Arc::new(MemoryStore::new());
        storage.set("authToken", "stored").unwrap();
        let config = Arc::new(AuthConfig::development());
        let store = Arc::new(CredentialStore::new(
            storage,
            Arc::new(MemoryCookieJar::new()),
            config.clone(),
        ));
        let session = Arc::new(SessionController::new(Arc::new(gateway), store, config));
        Arc::new(AppShell::new(session))
    }

    #[tokio::test]
    async fn test_forced_sign_out_moves_to_login() {
        let shell = shell_with_token(StubGateway::default());
        let listener = shell.spawn_event_listener();
        assert_eq!(shell.location(), Location::Pending("/".to_string()));

        shell.session.restore().await;
        for _ in 0..50 {
            if shell.location() == Location::At(LOGIN_PATH.to_string()) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(shell.location(), Location::At(LOGIN_PATH.to_string()));
        listener.abort();
    }

    #[tokio::test]
    async fn test_pending_then_settles_to_home() {
        let gateway = StubGateway::default();
        gateway
            .profiles
            .lock()
            .push_back(Ok(profile(UserRole::CustomerSupport)));
        let shell = shell_with_token(gateway);

        assert_eq!(shell.location(), Location::Pending("/".to_string()));
        shell.session.restore().await;
        assert_eq!(shell.settle(), Location::At("/faqs".to_string()));

        assert_eq!(shell.navigate("/users"), Location::At("/faqs".to_string()));
        assert_eq!(shell.navigate("/faqs"), Location::At("/faqs".to_string()));
    }

    #[tokio::test]
    async fn test_anonymous_goes_to_login() {
        let shell = shell_with_token(StubGateway::default());
        shell.session.restore().await;
        assert_eq!(
            shell.navigate("/dashboard"),
            Location::At(LOGIN_PATH.to_string())
        );
        assert_eq!(
            shell.navigate("/forgot-password"),
            Location::At("/forgot-password".to_string())
        );
    }
}
