//! Application Configuration

use std::time::Duration;

/// List controller configuration
#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Client-side timeout for one page fetch
    pub fetch_timeout: Duration,
    /// Largest page size an operator may pick
    pub max_page_size: u32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(15),
            max_page_size: 100,
        }
    }
}
