//! REST List Source
//!
//! `GET /api/{resource}` with the query as parameters. Responses carry
//! `{<items key>, pagination}` inside the envelope `data`. Writes go out as
//! `POST`, `PUT` or `DELETE` on the resource paths.

use kernel::error::app_error::{AppError, AppResult, OptionExt, ResultExt};
use kernel::error::kind::ErrorKind;
use platform::client::{ApiClient, BearerSource, envelope_data};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::mutation::{Method, Mutation, MutationSink};
use crate::domain::query::ResourceQuery;
use crate::domain::resource::Resource;
use crate::domain::result::{Page, Pagination};
use crate::domain::source::ListSource;

/// Key tried when the resource's own items key is absent
const GENERIC_ITEMS_KEY: &str = "items";

/// List source over the console REST API
///
/// One instance serves every resource; the bearer token is read from `B`
/// on each request.
#[derive(Debug, Clone)]
pub struct HttpListSource<B> {
    client: ApiClient,
    bearer: B,
}

impl<B: BearerSource> HttpListSource<B> {
    pub fn new(client: ApiClient, bearer: B) -> Self {
        Self { client, bearer }
    }
}

impl<R, B> ListSource<R> for HttpListSource<B>
where
    R: Resource,
    B: BearerSource,
{
    async fn fetch(&self, query: &ResourceQuery) -> AppResult<Page<R::Item>> {
        let token = self.bearer.bearer_token();
        let envelope = self
            .client
            .get(R::PATH, &query.to_params(), token.as_deref())
            .await?;
        decode_page(envelope, R::ITEMS_KEY, query)
    }
}

impl<B: BearerSource> MutationSink for HttpListSource<B> {
    async fn apply(&self, mutation: &Mutation) -> AppResult<()> {
        let token = self.bearer.bearer_token();
        let bearer = token.as_deref();
        let body = mutation.body.clone().unwrap_or_else(|| Value::Object(Default::default()));
        match mutation.method {
            Method::Post => self.client.post(&mutation.path, &body, bearer).await?,
            Method::Put => self.client.put(&mutation.path, &body, bearer).await?,
            Method::Delete => self.client.delete(&mutation.path, bearer).await?,
        };
        Ok(())
    }
}

/// Decode a list envelope
///
/// Accepts `data` as an object holding `items_key` (or `items`) and
/// `pagination`, or as a bare array. Missing pagination is derived from
/// the query so a single unpaginated page still renders.
pub fn decode_page<T: DeserializeOwned>(
    envelope: Value,
    items_key: &str,
    query: &ResourceQuery,
) -> AppResult<Page<T>> {
    let (items, pagination) = match envelope_data(envelope) {
        Value::Object(mut data) => {
            let items = data
                .remove(items_key)
                .or_else(|| data.remove(GENERIC_ITEMS_KEY))
                .ok_or_malformed(format!(
                    "Unexpected response format: missing '{items_key}'"
                ))?;
            (items, data.remove("pagination"))
        }
        items @ Value::Array(_) => (items, None),
        _ => {
            return Err(AppError::server(
                "Unexpected response format: list data is not an object",
            ));
        }
    };

    let items: Vec<T> = serde_json::from_value(items)
        .map_app_err(ErrorKind::Server, "Unexpected list item format")?;
    let pagination = match pagination {
        Some(value) => serde_json::from_value(value)
            .map_app_err(ErrorKind::Server, "Unexpected pagination format")?,
        None => Pagination {
            page: query.page(),
            page_size: query.page_size(),
            total: items.len() as u64,
            total_pages: 1,
        },
    };
    Ok(Page { items, pagination })
}
