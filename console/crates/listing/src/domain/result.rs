//! Query results

use kernel::error::kind::ErrorKind;
use serde::{Deserialize, Serialize};

use crate::domain::query::ResourceQuery;
use crate::error::ListError;

/// Server pagination block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    #[serde(rename = "limit")]
    pub page_size: u32,
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl Pagination {
    /// Highest page that can hold items, never below 1
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }
}

/// One fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Error of the latest fetch, as shown to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&ListError> for ListFailure {
    fn from(err: &ListError) -> Self {
        let app = err.to_app_error();
        Self {
            kind: app.kind(),
            message: app.message().to_string(),
        }
    }
}

/// Displayed state of a list
#[derive(Debug, Clone)]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    /// Query the items were fetched for; `None` until the first success
    pub fetched_for: Option<ResourceQuery>,
    pub status: ListStatus,
    pub error: Option<ListFailure>,
}

impl<T> Default for QueryResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            fetched_for: None,
            status: ListStatus::Idle,
            error: None,
        }
    }
}

impl<T> QueryResult<T> {
    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    /// Ready with nothing to show
    pub fn is_empty(&self) -> bool {
        self.status == ListStatus::Ready && self.items.is_empty()
    }
}
