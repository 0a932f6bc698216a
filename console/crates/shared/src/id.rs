//! Common ID Types
//!
//! Type-safe ID wrappers for server-side records.
//! The server issues opaque string ids (wire name `_id`), so the wrapper
//! carries a string rather than generating its own.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type UserId = Id<markers::User>;
/// let id: UserId = Id::new("6650f1c2a4");
/// assert_eq!(id.as_str(), "6650f1c2a4");
/// ```
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Wrap a server-issued id
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    /// Get the underlying string
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Convert to String
    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Marker types for different record IDs
pub mod markers {
    /// Marker for operator (user) IDs
    pub struct User;

    /// Marker for FAQ IDs
    pub struct Faq;

    /// Marker for FAQ suggestion IDs
    pub struct Suggestion;

    /// Marker for conversation IDs
    pub struct Conversation;
}

/// Type aliases for common IDs
pub type UserId = Id<markers::User>;
pub type FaqId = Id<markers::Faq>;
pub type SuggestionId = Id<markers::Suggestion>;
pub type ConversationId = Id<markers::Conversation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serde_is_transparent() {
        let id: UserId = serde_json::from_str("\"6650f1c2a4\"").unwrap();
        assert_eq!(id.as_str(), "6650f1c2a4");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"6650f1c2a4\"");
    }

    #[test]
    fn test_id_equality_by_value() {
        let a: FaqId = Id::new("abc");
        let b: FaqId = "abc".into();
        assert_eq!(a, b);
        assert_ne!(a, FaqId::new("abd"));
    }

    #[test]
    fn test_id_is_send_sync_without_marker_bounds() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ConversationId>();
    }
}
