//! Application Layer

pub mod config;
pub mod controller;

pub use config::ListConfig;
pub use controller::ResourceListController;
