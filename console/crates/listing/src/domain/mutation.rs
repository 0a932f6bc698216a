//! List write port
//!
//! Creates, updates, deletes and review actions on list rows. The
//! controller refetches its current query after every successful write.

use std::fmt;

use kernel::error::app_error::AppResult;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
    Delete,
}

/// One write request against a list resource
#[derive(Clone, PartialEq)]
pub struct Mutation {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl Mutation {
    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> AppResult<Self> {
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn put<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> AppResult<Self> {
        Ok(Self {
            method: Method::Put,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
        }
    }
}

// Bodies may carry passwords
impl fmt::Debug for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutation")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[trait_variant::make(MutationSink: Send)]
pub trait LocalMutationSink {
    /// Send the write; the response body is not used
    async fn apply(&self, mutation: &Mutation) -> AppResult<()>;
}

/// `{collection}/{id}`
pub fn record_path(collection: &str, id: &str) -> String {
    format!("{collection}/{id}")
}
