//! Entity Module

pub mod profile;
pub mod reset_capability;
pub mod session;
