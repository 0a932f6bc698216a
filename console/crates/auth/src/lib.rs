//! Auth (Authentication) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session and profile entities, value objects, gateway trait
//! - `application/` - Session controller, credential store, password reset, route guard
//! - `infra/` - REST API gateway implementation
//! - `presentation/` - Form view-models (login, OTP input, new password)
//!
//! ## Features
//! - Username + password sign-in with bearer tokens
//! - Credential persistence in key/value storage with a cookie fallback
//! - Start-up session confirmation with forced sign-out on a rejected token
//! - Email OTP password reset
//! - Role-based route gating (Admin, Customer Support)
//!
//! ## Security Model
//! - Tokens, passwords and OTP codes are never logged (redacted `Debug`)
//! - Secrets are zeroized on drop
//! - The reset capability is single-use and erased on cancel, success or reject

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::credential_store::{CredentialStore, StoredCredentials};
pub use application::password_reset::{PasswordResetFlow, ResetStep};
pub use application::route_guard::{RouteDecision, RouteGuard, RouteTable};
pub use application::session_controller::{SessionController, SessionEvent, SessionReader};
pub use domain::entity::profile::Profile;
pub use domain::entity::session::{Session, SessionStatus};
pub use error::{AuthError, AuthResult};
pub use infra::http::HttpAuthGateway;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
pub use kernel::role::UserRole;
