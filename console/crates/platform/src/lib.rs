//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the console client:
//! - HTTP transport and response envelope handling
//! - Cookie jar and key/value storage backends
//! - Secret strings and password policy (NIST SP 800-63B)
//! - Transient user notifications
//! - Client configuration

pub mod client;
pub mod config;
pub mod cookie;
pub mod notify;
pub mod password;
pub mod secret;
pub mod storage;
