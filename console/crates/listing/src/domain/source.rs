//! List source port
//!
//! Fetches one page of a resource for a query. The REST implementation is in
//! the infra layer; tests use in-memory sources.

use kernel::error::app_error::AppResult;

use crate::domain::query::ResourceQuery;
use crate::domain::resource::Resource;
use crate::domain::result::Page;

#[trait_variant::make(ListSource: Send)]
pub trait LocalListSource<R: Resource> {
    /// `GET R::PATH` with the query's parameters
    async fn fetch(&self, query: &ResourceQuery) -> AppResult<Page<R::Item>>;
}
