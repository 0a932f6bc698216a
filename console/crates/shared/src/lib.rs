//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of the console vocabulary:
//! - The client error taxonomy and result aliases
//! - Typed identifiers for server-side records
//! - The operator role vocabulary shared by session gating and user listings
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod role;
