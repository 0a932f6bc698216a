//! Resource Query
//!
//! Combined search, filter, sort and pagination state of a list.
//!
//! Page policy:
//! - free text, filter and page size changes go back to page 1
//! - sort changes keep the current page
//!
//! Every mutator validates against the resource [`Vocabulary`] first and
//! leaves the query untouched on error. It returns whether the query changed.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::resource::Vocabulary;
use crate::error::{ListError, ListResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ListError::InvalidValue(format!(
                "Unknown sort direction '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sort {
    pub key: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    free_text: String,
    filters: BTreeMap<String, String>,
    sort: Option<Sort>,
    page: u32,
    page_size: u32,
}

impl ResourceQuery {
    /// Query with the resource defaults
    pub fn defaults(vocab: &Vocabulary) -> Self {
        Self {
            free_text: String::new(),
            filters: BTreeMap::new(),
            sort: vocab.default_sort.map(|(key, direction)| Sort {
                key: key.to_string(),
                direction,
            }),
            page: 1,
            page_size: vocab.default_page_size.max(1),
        }
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn set_search(&mut self, vocab: &Vocabulary, text: &str) -> ListResult<bool> {
        vocab.check_searchable()?;
        let text = text.trim();
        let changed = self.free_text != text || self.page != 1;
        self.free_text = text.to_string();
        self.page = 1;
        Ok(changed)
    }

    /// Set a filter; a blank value removes it
    pub fn set_filter(&mut self, vocab: &Vocabulary, name: &str, value: &str) -> ListResult<bool> {
        vocab.check_filter(name)?;
        let value = value.trim();
        let previous = if value.is_empty() {
            self.filters.remove(name)
        } else {
            self.filters.insert(name.to_string(), value.to_string())
        };
        let changed = previous.as_deref() != Some(value).filter(|v| !v.is_empty());
        let changed = changed || self.page != 1;
        self.page = 1;
        Ok(changed)
    }

    pub fn clear_filter(&mut self, vocab: &Vocabulary, name: &str) -> ListResult<bool> {
        self.set_filter(vocab, name, "")
    }

    /// Apply several filter changes as one mutation
    ///
    /// All names are checked before anything changes. `None` removes a filter.
    pub fn set_filters(
        &mut self,
        vocab: &Vocabulary,
        changes: &[(&str, Option<&str>)],
    ) -> ListResult<bool> {
        for (name, _) in changes {
            vocab.check_filter(name)?;
        }
        let mut changed = false;
        for (name, value) in changes {
            changed |= self.set_filter(vocab, name, value.unwrap_or_default())?;
        }
        Ok(changed)
    }

    pub fn set_sort(
        &mut self,
        vocab: &Vocabulary,
        key: &str,
        direction: SortDirection,
    ) -> ListResult<bool> {
        vocab.check_sort_key(key)?;
        let sort = Sort {
            key: key.to_string(),
            direction,
        };
        let changed = self.sort.as_ref() != Some(&sort);
        self.sort = Some(sort);
        Ok(changed)
    }

    pub fn set_page(&mut self, page: u32) -> ListResult<bool> {
        if page == 0 {
            return Err(ListError::InvalidPage);
        }
        let changed = self.page != page;
        self.page = page;
        Ok(changed)
    }

    /// Back to page 1, everything else kept
    pub fn rewind(&mut self) -> bool {
        let changed = self.page != 1;
        self.page = 1;
        changed
    }

    pub fn set_page_size(&mut self, page_size: u32, max: u32) -> ListResult<bool> {
        if page_size == 0 || page_size > max {
            return Err(ListError::InvalidPageSize { max });
        }
        let changed = self.page_size != page_size || self.page != 1;
        self.page_size = page_size;
        self.page = 1;
        Ok(changed)
    }

    /// Back to the resource defaults
    pub fn reset(&mut self, vocab: &Vocabulary) -> bool {
        let defaults = Self::defaults(vocab);
        let changed = *self != defaults;
        *self = defaults;
        changed
    }

    /// Query string parameters in wire order
    ///
    /// `page` and `limit` are always sent; empty search and filters are omitted.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.page_size.to_string()),
        ];
        if !self.free_text.is_empty() {
            params.push(("search".to_string(), self.free_text.clone()));
        }
        for (name, value) in &self.filters {
            params.push((name.clone(), value.clone()));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort_by".to_string(), sort.key.clone()));
            params.push(("sort_order".to_string(), sort.direction.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOCAB: Vocabulary = Vocabulary {
        resource: "users",
        filters: &["role", "is_active"],
        sort_keys: &["username", "created_at"],
        searchable: true,
        default_sort: Some(("created_at", SortDirection::Desc)),
        default_page_size: 10,
    };

    fn on_page(page: u32) -> ResourceQuery {
        let mut q = ResourceQuery::defaults(&VOCAB);
        q.set_page(page).unwrap();
        q
    }

    #[test]
    fn test_defaults() {
        let q = ResourceQuery::defaults(&VOCAB);
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), 10);
        assert_eq!(
            q.sort(),
            Some(&Sort {
                key: "created_at".into(),
                direction: SortDirection::Desc
            })
        );
    }

    #[test]
    fn test_filter_and_page_size_sequences_land_on_page_one() {
        let mut q = on_page(4);
        q.set_filter(&VOCAB, "role", "admin").unwrap();
        assert_eq!(q.page(), 1);

        q.set_page(3).unwrap();
        q.set_page_size(25, 100).unwrap();
        assert_eq!(q.page(), 1);

        q.set_page(2).unwrap();
        // unchanged value still returns to page 1
        assert!(q.set_filter(&VOCAB, "role", "admin").unwrap());
        assert_eq!(q.page(), 1);

        q.set_page(5).unwrap();
        q.clear_filter(&VOCAB, "is_active").unwrap();
        assert_eq!(q.page(), 1);
    }

    #[test]
    fn test_sort_sequences_keep_page() {
        let mut q = on_page(3);
        q.set_sort(&VOCAB, "username", SortDirection::Asc).unwrap();
        q.set_sort(&VOCAB, "username", SortDirection::Desc).unwrap();
        q.set_sort(&VOCAB, "created_at", SortDirection::Asc).unwrap();
        assert_eq!(q.page(), 3);
    }

    #[test]
    fn test_search_resets_page_and_trims() {
        let mut q = on_page(2);
        assert!(q.set_search(&VOCAB, "  alice ").unwrap());
        assert_eq!(q.free_text(), "alice");
        assert_eq!(q.page(), 1);
        assert!(!q.set_search(&VOCAB, "alice").unwrap());
    }

    #[test]
    fn test_invalid_mutations_leave_query_untouched() {
        let mut q = on_page(2);
        let before = q.clone();
        assert!(q.set_filter(&VOCAB, "colour", "red").is_err());
        assert!(q.set_sort(&VOCAB, "password", SortDirection::Asc).is_err());
        assert!(matches!(q.set_page(0), Err(ListError::InvalidPage)));
        assert!(matches!(
            q.set_page_size(0, 100),
            Err(ListError::InvalidPageSize { max: 100 })
        ));
        assert!(q.set_page_size(101, 100).is_err());
        assert!(
            q.set_filters(&VOCAB, &[("role", Some("admin")), ("colour", None)])
                .is_err()
        );
        assert_eq!(q, before);
    }

    #[test]
    fn test_blank_filter_removes_it() {
        let mut q = ResourceQuery::defaults(&VOCAB);
        q.set_filter(&VOCAB, "role", "admin").unwrap();
        assert!(q.set_filter(&VOCAB, "role", "  ").unwrap());
        assert_eq!(q.filter("role"), None);
        assert!(!q.set_filter(&VOCAB, "role", "").unwrap());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut q = on_page(3);
        q.set_search(&VOCAB, "bob").unwrap();
        q.set_sort(&VOCAB, "username", SortDirection::Asc).unwrap();
        assert!(q.reset(&VOCAB));
        assert_eq!(q, ResourceQuery::defaults(&VOCAB));
        assert!(!q.reset(&VOCAB));
    }

    #[test]
    fn test_to_params() {
        let mut q = ResourceQuery::defaults(&VOCAB);
        q.set_search(&VOCAB, " bob ").unwrap();
        q.set_filter(&VOCAB, "role", "customer_support").unwrap();
        q.set_filter(&VOCAB, "is_active", "true").unwrap();
        let params = q.to_params();
        let pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("page", "1"),
                ("limit", "10"),
                ("search", "bob"),
                ("is_active", "true"),
                ("role", "customer_support"),
                ("sort_by", "created_at"),
                ("sort_order", "desc"),
            ]
        );
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("up".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::Asc.reversed(), SortDirection::Desc);
    }
}
