//! REST API client
//!
//! Thin reqwest wrapper for the console API. It owns transport details only:
//! bearer header, JSON bodies, the `{success, data, error, message}` envelope
//! and HTTP error mapping into [`AppError`].

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::kind::ErrorKind;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ClientConfig;

/// Source of the bearer token attached to authorized requests
///
/// Implemented by the session layer so transport adapters never read
/// credential storage directly.
pub trait BearerSource: Send + Sync {
    /// Current bearer token, if any
    fn bearer_token(&self) -> Option<String>;
}

impl BearerSource for Option<String> {
    fn bearer_token(&self) -> Option<String> {
        self.clone()
    }
}

/// Console REST API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Build a client with the configured transport timeout
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client, config })
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET path?query` and return the decoded envelope
    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
        bearer: Option<&str>,
    ) -> AppResult<Value> {
        let builder = self.client.get(self.config.url(path)).query(query);
        self.send(path, builder, bearer).await
    }

    /// `POST path` with a JSON body and return the decoded envelope
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> AppResult<Value> {
        let builder = json_body(self.client.post(self.config.url(path)), body)?;
        self.send(path, builder, bearer).await
    }

    /// `PUT path` with a JSON body and return the decoded envelope
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> AppResult<Value> {
        let builder = json_body(self.client.put(self.config.url(path)), body)?;
        self.send(path, builder, bearer).await
    }

    /// `DELETE path` and return the decoded envelope
    pub async fn delete(&self, path: &str, bearer: Option<&str>) -> AppResult<Value> {
        let builder = self.client.delete(self.config.url(path));
        self.send(path, builder, bearer).await
    }

    async fn send(
        &self,
        path: &str,
        builder: RequestBuilder,
        bearer: Option<&str>,
    ) -> AppResult<Value> {
        let builder = builder.header(reqwest::header::ACCEPT, "application/json");
        let builder = match bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        debug!(path, status, bytes = body.len(), "API response received");

        let decoded = decode_envelope(status, body.as_ref());
        if let Err(err) = &decoded {
            if err.kind() == ErrorKind::Server {
                error!(path, status, error = %err, "API server error");
            }
        }
        decoded
    }
}

fn json_body<B: Serialize + ?Sized>(builder: RequestBuilder, body: &B) -> AppResult<RequestBuilder> {
    let payload = serde_json::to_vec(body)?;
    Ok(builder
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(payload))
}

/// Decode a response body according to the envelope convention
///
/// * non-2xx: mapped through [`map_status_error`]
/// * 2xx with `success: false`: server rejection carrying its message
/// * 2xx otherwise: the full envelope as JSON
pub fn decode_envelope(status: u16, body: &[u8]) -> AppResult<Value> {
    if !(200..300).contains(&status) {
        return Err(map_status_error(status, body));
    }
    if body.is_empty() {
        return Ok(Value::Null);
    }

    let value: Value = serde_json::from_slice(body)?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let err = match envelope_message(&value) {
            Some(message) => AppError::bad_request(message),
            None => AppError::from_kind(ErrorKind::BadRequest),
        };
        return Err(err.with_status(status));
    }
    Ok(value)
}

/// Map an HTTP error status and optional envelope body to an [`AppError`]
pub fn map_status_error(status: u16, body: &[u8]) -> AppError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(envelope_message);
    AppError::from_status(status, message)
}

/// Extract `data` from an envelope, or the envelope itself when absent
pub fn envelope_data(envelope: Value) -> Value {
    match envelope {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    }
}

fn envelope_message(value: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}
