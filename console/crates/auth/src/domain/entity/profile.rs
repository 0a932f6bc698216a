//! Profile Entity
//!
//! Snapshot of the signed-in operator as returned by the server. Replaced
//! wholesale on refresh, never patched field by field.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::role::UserRole;
use serde::{Deserialize, Serialize};

/// Operator profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Server-issued id
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Name shown in the app chrome
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }

    /// Home route for this operator's role
    pub fn home_path(&self) -> &'static str {
        self.role.home_path()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_profile() {
        let json = r#"{
            "_id": "665f0c1e9b1d4a0012345678",
            "username": "support1",
            "email": "support1@example.com",
            "full_name": "Support One",
            "role": "customer_support",
            "is_active": true,
            "last_login_at": "2024-06-01T10:00:00.000Z",
            "created_at": "2024-01-01T00:00:00.000Z",
            "updated_at": "2024-06-01T10:00:00.000Z"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id.as_str(), "665f0c1e9b1d4a0012345678");
        assert_eq!(profile.role, UserRole::CustomerSupport);
        assert_eq!(profile.display_name(), "Support One");
        assert_eq!(profile.home_path(), "/faqs");
    }

    #[test]
    fn test_missing_last_login() {
        let json = r#"{
            "_id": "1", "username": "admin", "email": "a@example.com",
            "full_name": "", "role": "admin", "is_active": true,
            "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert!(profile.last_login_at.is_none());
        assert_eq!(profile.display_name(), "admin");
    }

    #[test]
    fn test_roundtrip_keeps_wire_id_name() {
        let profile = fixtures::profile("ops", UserRole::Admin);
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["_id"], "id-ops");
        assert_eq!(value["role"], "admin");
    }
}
