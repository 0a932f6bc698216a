//! Session Entity
//!
//! Snapshot of the client's authentication state. The authenticated variant
//! owns both the profile and the token, so a half-populated session cannot be
//! constructed.

use std::sync::Arc;

use derive_more::Display;
use kernel::error::kind::ErrorKind;
use kernel::role::UserRole;
use platform::secret::SecretString;

use crate::domain::entity::profile::Profile;
use crate::error::AuthError;

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionStatus {
    #[display("anonymous")]
    Anonymous,
    #[display("verifying")]
    Verifying,
    #[display("authenticated")]
    Authenticated,
    #[display("error")]
    Error,
}

/// Last failure recorded on the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&AuthError> for SessionFailure {
    fn from(err: &AuthError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Client session snapshot
#[derive(Debug, Clone)]
pub enum Session {
    /// No credentials. `last_error` holds the reason of the latest rejection.
    Anonymous { last_error: Option<SessionFailure> },
    /// Credentials submitted or being confirmed
    Verifying,
    /// Token and profile both present
    Authenticated {
        profile: Arc<Profile>,
        token: SecretString,
    },
    /// Stored credentials could not be confirmed for a non-auth reason
    Error { last_error: SessionFailure },
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl Session {
    pub fn anonymous() -> Self {
        Session::Anonymous { last_error: None }
    }

    pub fn verifying() -> Self {
        Session::Verifying
    }

    pub fn authenticated(profile: Arc<Profile>, token: SecretString) -> Self {
        Session::Authenticated { profile, token }
    }

    /// Anonymous session carrying the rejection reason
    pub fn rejected(err: &AuthError) -> Self {
        Session::Anonymous {
            last_error: Some(err.into()),
        }
    }

    /// Error session; stored credentials are kept for a retry
    pub fn failed(err: &AuthError) -> Self {
        Session::Error {
            last_error: err.into(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self {
            Session::Anonymous { .. } => SessionStatus::Anonymous,
            Session::Verifying => SessionStatus::Verifying,
            Session::Authenticated { .. } => SessionStatus::Authenticated,
            Session::Error { .. } => SessionStatus::Error,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn profile(&self) -> Option<&Arc<Profile>> {
        match self {
            Session::Authenticated { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<&SecretString> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.profile().map(|p| p.role)
    }

    pub fn last_error(&self) -> Option<&SessionFailure> {
        match self {
            Session::Anonymous { last_error } => last_error.as_ref(),
            Session::Error { last_error } => Some(last_error),
            _ => None,
        }
    }
}
