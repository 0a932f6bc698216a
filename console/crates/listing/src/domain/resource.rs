//! Resource vocabulary
//!
//! A [`Resource`] names the endpoint of a list, the key its items arrive
//! under, and the filters and sort keys the server understands.

use serde::de::DeserializeOwned;

use crate::domain::query::SortDirection;
use crate::error::{ListError, ListResult};

/// Query vocabulary of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    /// Name used in logs and error messages
    pub resource: &'static str,
    pub filters: &'static [&'static str],
    pub sort_keys: &'static [&'static str],
    pub searchable: bool,
    pub default_sort: Option<(&'static str, SortDirection)>,
    pub default_page_size: u32,
}

impl Vocabulary {
    pub fn check_filter(&self, name: &str) -> ListResult<()> {
        if self.filters.iter().any(|f| *f == name) {
            Ok(())
        } else {
            Err(ListError::UnknownFilter {
                resource: self.resource,
                name: name.to_string(),
            })
        }
    }

    pub fn check_sort_key(&self, key: &str) -> ListResult<()> {
        if self.sort_keys.iter().any(|k| *k == key) {
            Ok(())
        } else {
            Err(ListError::UnknownSortKey {
                resource: self.resource,
                key: key.to_string(),
            })
        }
    }

    pub fn check_searchable(&self) -> ListResult<()> {
        if self.searchable {
            Ok(())
        } else {
            Err(ListError::SearchUnsupported {
                resource: self.resource,
            })
        }
    }
}

/// A remotely listed resource
pub trait Resource: Send + Sync + 'static {
    type Item: DeserializeOwned + Clone + Send + Sync + 'static;

    /// `GET` path of the list endpoint
    const PATH: &'static str;

    /// Key of the item array inside the response `data`
    const ITEMS_KEY: &'static str;

    const VOCABULARY: Vocabulary;
}
