//! Infrastructure Layer
//!
//! REST implementation of the list source.

pub mod http;

pub use http::HttpListSource;
