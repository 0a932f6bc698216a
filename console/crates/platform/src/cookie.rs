//! Cookie Management Infrastructure
//!
//! Cookie attributes, `Set-Cookie` rendering and a client-side cookie jar.
//! Encoding and attribute parsing go through the `cookie` crate with
//! percent-encoded values.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cookie::Cookie;
use parking_lot::Mutex;

use crate::storage::StorageError;

/// SameSite policy for cookies
pub use cookie::SameSite;

/// Cookie configuration
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age: Option<Duration>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: false,
            http_only: false,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age: None,
        }
    }
}

impl CookieConfig {
    /// Script-readable cookie with the given name and lifetime
    pub fn persistent(name: impl Into<String>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            max_age: Some(max_age),
            ..Default::default()
        }
    }

    /// Build Set-Cookie header value
    pub fn build_set_cookie(&self, value: &str) -> String {
        let mut builder = Cookie::build((self.name.clone(), value.to_string()))
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(self.same_site)
            .path(self.path.clone());
        if let Some(max_age) = self.max_age {
            builder = builder.max_age(cookie::time::Duration::seconds(
                i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX),
            ));
        }
        builder.build().encoded().to_string()
    }

    /// Build Set-Cookie header for deletion (expired)
    pub fn build_delete_cookie(&self) -> String {
        Cookie::build((self.name.clone(), ""))
            .path(self.path.clone())
            .max_age(cookie::time::Duration::ZERO)
            .build()
            .encoded()
            .to_string()
    }
}

/// Extract a cookie value from a `Cookie` header string
pub fn extract_cookie(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse_encoded(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Client-side cookie jar
pub trait CookieJar: Send + Sync {
    /// Read a live (unexpired) cookie
    fn get(&self, name: &str) -> Result<Option<String>, StorageError>;

    /// Store a cookie with the given attributes
    fn set(&self, config: &CookieConfig, value: &str) -> Result<(), StorageError>;

    /// Expire a cookie
    fn remove(&self, config: &CookieConfig) -> Result<(), StorageError>;
}

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl StoredCookie {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-memory cookie jar driven by `Set-Cookie` strings
#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, StoredCookie>>,
    blocked: Mutex<bool>,
}

impl MemoryCookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a jar whose operations always fail (cookies disabled)
    pub fn blocked() -> Self {
        let jar = Self::default();
        jar.set_blocked(true);
        jar
    }

    /// Toggle the blocked mode
    pub fn set_blocked(&self, blocked: bool) {
        *self.blocked.lock() = blocked;
    }

    /// Apply a `Set-Cookie` header value
    ///
    /// `Max-Age=0` (or negative) removes the cookie.
    pub fn apply_set_cookie(&self, header: &str) -> Result<(), StorageError> {
        self.check()?;
        self.apply_at(header, Utc::now())
    }

    /// Render the `Cookie` request header for all live cookies
    pub fn cookie_header(&self) -> String {
        let now = Utc::now();
        self.cookies
            .lock()
            .iter()
            .filter(|(_, cookie)| cookie.is_live(now))
            .map(|(name, cookie)| {
                Cookie::new(name.as_str(), cookie.value.as_str())
                    .encoded()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn apply_at(&self, header: &str, now: DateTime<Utc>) -> Result<(), StorageError> {
        let parsed = Cookie::parse_encoded(header)
            .map_err(|e| StorageError::Unavailable(format!("malformed cookie: {e}")))?;
        let expires_at = parsed
            .max_age()
            .and_then(|max_age| chrono::Duration::try_seconds(max_age.whole_seconds()))
            .and_then(|max_age| now.checked_add_signed(max_age));

        let mut cookies = self.cookies.lock();
        match expires_at {
            Some(at) if at <= now => {
                cookies.remove(parsed.name());
            }
            _ => {
                cookies.insert(
                    parsed.name().to_string(),
                    StoredCookie {
                        value: parsed.value().to_string(),
                        expires_at,
                    },
                );
            }
        }
        Ok(())
    }

    fn check(&self) -> Result<(), StorageError> {
        if *self.blocked.lock() {
            return Err(StorageError::Unavailable("cookies are blocked".to_string()));
        }
        Ok(())
    }
}

impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(extract_cookie(&self.cookie_header(), name))
    }

    fn set(&self, config: &CookieConfig, value: &str) -> Result<(), StorageError> {
        self.apply_set_cookie(&config.build_set_cookie(value))
    }

    fn remove(&self, config: &CookieConfig) -> Result<(), StorageError> {
        self.apply_set_cookie(&config.build_delete_cookie())
    }
}
