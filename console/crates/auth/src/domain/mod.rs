//! Domain Layer
//!
//! Contains entities, value objects, and the auth gateway trait.

pub mod entity;
pub mod gateway;
pub mod value_object;

// Re-exports
pub use entity::{profile::Profile, reset_capability::ResetCapability, session::Session};
pub use gateway::{AuthGateway, LoginGrant, OtpVerification};
