//! Application Layer
//!
//! Session lifecycle, credential persistence, password reset and route gating.

pub mod config;
pub mod credential_store;
pub mod password_reset;
pub mod route_guard;
pub mod session_controller;

// Re-exports
pub use config::AuthConfig;
pub use credential_store::{CredentialStore, StoredCredentials};
pub use password_reset::{PasswordResetFlow, ResetStep};
pub use route_guard::{RouteDecision, RouteGuard, RouteTable};
pub use session_controller::{SessionController, SessionEvent, SessionReader};
