//! Session Controller
//!
//! Owns the session state machine:
//!
//! ```text
//! anonymous --login--> verifying --accepted--> authenticated
//!                                --rejected--> anonymous (last_error)
//! anonymous --restore(token found)--> verifying --profile ok--> authenticated
//!                                               --token invalid--> anonymous + ForcedSignOut
//!                                               --network/5xx--> error (credentials kept)
//! authenticated --logout--> anonymous
//! ```
//!
//! A controller created over stored credentials starts in `verifying`, so
//! route gating waits for the confirmation instead of redirecting to login.
//! Results of in-flight requests are applied only while the session is still
//! `verifying`; a sign-out in between wins.
//!
//! State is published on a `watch` channel, lifecycle events on a
//! `broadcast` channel.

use std::sync::Arc;

use kernel::error::kind::ErrorKind;
use platform::client::BearerSource;
use platform::secret::SecretString;
use tokio::sync::{OnceCell, broadcast, watch};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::application::config::AuthConfig;
use crate::application::credential_store::CredentialStore;
use crate::domain::entity::profile::Profile;
use crate::domain::entity::session::Session;
use crate::domain::gateway::AuthGateway;
use crate::error::{AuthError, AuthResult};

const EVENT_CAPACITY: usize = 16;

/// Session lifecycle events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { username: String },
    SignedOut,
    /// Stored token rejected during start-up confirmation
    ForcedSignOut { reason: String },
}

/// Session controller
pub struct SessionController<G>
where
    G: AuthGateway,
{
    gateway: Arc<G>,
    store: Arc<CredentialStore>,
    config: Arc<AuthConfig>,
    state: watch::Sender<Session>,
    events: broadcast::Sender<SessionEvent>,
    restored: OnceCell<()>,
}

impl<G> SessionController<G>
where
    G: AuthGateway,
{
    pub fn new(gateway: Arc<G>, store: Arc<CredentialStore>, config: Arc<AuthConfig>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let initial = if store.load().is_some() {
            Session::verifying()
        } else {
            Session::anonymous()
        };
        Self {
            gateway,
            store,
            config,
            state: watch::Sender::new(initial),
            events,
            restored: OnceCell::new(),
        }
    }

    /// Current session snapshot
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Subscribe to session state changes
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Subscribe to lifecycle events
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Read-only handle exposing the bearer token to transport adapters
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            state: self.state.subscribe(),
        }
    }

    /// Sign in with username and password
    ///
    /// Empty fields are rejected locally without touching the session.
    pub async fn login(&self, username: &str, password: &SecretString) -> AuthResult<Arc<Profile>> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Please enter your username and password".to_string(),
            ));
        }

        let mut in_flight = false;
        self.state.send_if_modified(|session| {
            if matches!(session, Session::Verifying) {
                in_flight = true;
                false
            } else {
                *session = Session::verifying();
                true
            }
        });
        if in_flight {
            return Err(AuthError::SignInInProgress);
        }

        let result = match timeout(
            self.config.login_timeout,
            self.gateway.login(username, password),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AuthError::Network("sign-in timed out".to_string())),
        };

        match result {
            Ok(grant) => {
                let profile = Arc::new(grant.profile);
                let applied = self.apply_if_verifying(|| {
                    if let Err(e) = self.store.save(&grant.token, &profile) {
                        warn!(error = %e, "Signed in without persisted credentials");
                    }
                    Session::authenticated(profile.clone(), grant.token.clone())
                });
                if !applied {
                    info!(username = %profile.username, "Sign-in discarded after sign-out");
                    return Err(AuthError::SignInCancelled);
                }
                info!(username = %profile.username, role = %profile.role, "User signed in");
                let _ = self.events.send(SessionEvent::SignedIn {
                    username: profile.username.clone(),
                });
                Ok(profile)
            }
            Err(err) => {
                err.log();
                self.apply_if_verifying(|| Session::rejected(&err));
                Err(err)
            }
        }
    }

    /// Confirm stored credentials with the server
    ///
    /// Runs once per controller instance. Concurrent callers wait for that
    /// confirmation; later calls return the current snapshot without
    /// contacting the server.
    pub async fn restore(&self) -> Session {
        self.restored
            .get_or_init(|| async {
                self.confirm_stored().await;
            })
            .await;
        self.snapshot()
    }

    /// Retry a start-up confirmation that failed for a non-auth reason
    pub async fn retry_restore(&self) -> Session {
        let failed = matches!(&*self.state.borrow(), Session::Error { .. });
        if failed {
            return self.confirm_stored().await;
        }
        self.snapshot()
    }

    async fn confirm_stored(&self) -> Session {
        let Some(stored) = self.store.load() else {
            self.state.send_replace(Session::anonymous());
            return self.snapshot();
        };

        self.state.send_replace(Session::verifying());

        let result = match timeout(
            self.config.login_timeout,
            self.gateway.current_user(&stored.token),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(AuthError::Network("session check timed out".to_string())),
        };

        match result {
            Ok(profile) => {
                let profile = Arc::new(profile);
                let applied = self.apply_if_verifying(|| {
                    if let Err(e) = self.store.save(&stored.token, &profile) {
                        warn!(error = %e, "Confirmed session could not be re-cached");
                    }
                    Session::authenticated(profile.clone(), stored.token.clone())
                });
                if applied {
                    info!(username = %profile.username, "Session restored");
                }
            }
            Err(err) if err.kind() == ErrorKind::Auth => {
                warn!(error = %err, "Stored session rejected, signing out");
                let applied = self.apply_if_verifying(|| {
                    self.store.clear();
                    Session::anonymous()
                });
                if applied {
                    let _ = self.events.send(SessionEvent::ForcedSignOut {
                        reason: err.to_string(),
                    });
                }
            }
            Err(err) => {
                err.log();
                self.apply_if_verifying(|| Session::failed(&err));
            }
        }
        self.snapshot()
    }

    /// Replace a `verifying` session with the outcome of its request
    ///
    /// `outcome` runs under the state lock, so persistence it performs cannot
    /// interleave with a sign-out. Returns false when the session moved on.
    fn apply_if_verifying(&self, outcome: impl FnOnce() -> Session) -> bool {
        self.state.send_if_modified(|session| {
            if !matches!(session, Session::Verifying) {
                return false;
            }
            *session = outcome();
            true
        })
    }

    /// Re-fetch the profile of the signed-in operator
    ///
    /// A rejection is returned to the caller and does not sign out.
    pub async fn refresh_profile(&self) -> AuthResult<Arc<Profile>> {
        let Some(token) = self.state.borrow().token().cloned() else {
            return Err(AuthError::SessionInvalid);
        };

        let profile = Arc::new(self.gateway.current_user(&token).await?);

        let mut applied = false;
        self.state.send_if_modified(|session| {
            // Logged out or re-authenticated while the request was in flight
            if session.token() != Some(&token) {
                return false;
            }
            *session = Session::authenticated(profile.clone(), token.clone());
            applied = true;
            true
        });
        if applied {
            if let Err(e) = self.store.save(&token, &profile) {
                warn!(error = %e, "Refreshed profile could not be cached");
            }
        }
        Ok(profile)
    }

    /// Sign out
    ///
    /// The server is notified best-effort; local credentials are cleared
    /// regardless of the outcome.
    pub async fn logout(&self) {
        let token = self
            .state
            .borrow()
            .token()
            .cloned()
            .or_else(|| self.store.load().map(|stored| stored.token));

        if let Some(token) = token {
            match timeout(self.config.login_timeout, self.gateway.logout(&token)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "Server logout failed, clearing locally"),
                Err(_) => warn!("Server logout timed out, clearing locally"),
            }
        }

        // Publish first: an in-flight request applies only while verifying
        self.state.send_replace(Session::anonymous());
        self.store.clear();
        info!("User signed out");
        let _ = self.events.send(SessionEvent::SignedOut);
    }
}

/// Read-only view of the session
#[derive(Clone)]
pub struct SessionReader {
    state: watch::Receiver<Session>,
}

impl SessionReader {
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }
}

impl BearerSource for SessionReader {
    fn bearer_token(&self) -> Option<String> {
        self.state
            .borrow()
            .token()
            .map(|token| token.expose().to_string())
    }
}
