//! Infrastructure Layer
//!
//! REST API implementation of the auth gateway.

pub mod http;

pub use http::HttpAuthGateway;
