//! Credential Store
//!
//! Sole owner of persisted auth state. The bearer token is written to two
//! redundant backends (key/value storage and a cookie); the cached profile,
//! the authenticated marker and the reset capability live in key/value
//! storage only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::cookie::CookieJar;
use platform::secret::SecretString;
use platform::storage::{KeyValueStore, StorageError};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::application::config::AuthConfig;
use crate::domain::entity::profile::Profile;
use crate::domain::entity::reset_capability::ResetCapability;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Credentials recovered from storage
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub token: SecretString,
    /// Cached profile; absent when missing or corrupt
    pub profile: Option<Profile>,
}

/// Persisted form of a reset capability
#[derive(Serialize, Deserialize)]
struct ResetRecord {
    email: String,
    reset_token: String,
    issued_at: DateTime<Utc>,
    expires_in_minutes: u32,
}

/// Credential store over key/value storage and a cookie jar
pub struct CredentialStore {
    storage: Arc<dyn KeyValueStore>,
    cookies: Arc<dyn CookieJar>,
    config: Arc<AuthConfig>,
}

impl CredentialStore {
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        cookies: Arc<dyn CookieJar>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            storage,
            cookies,
            config,
        }
    }

    /// Persist token and profile
    ///
    /// Succeeds when at least one backend accepted the token.
    pub fn save(&self, token: &SecretString, profile: &Profile) -> AuthResult<()> {
        let profile_json = serde_json::to_string(profile).map_err(StorageError::from)?;

        let stored = self.write_storage(token, &profile_json);
        let cookie = self
            .cookies
            .set(&self.config.token_cookie(), token.expose());

        match (stored, cookie) {
            (Ok(()), Ok(())) => {
                debug!(username = %profile.username, "Credentials saved");
                Ok(())
            }
            (Err(e), Ok(())) => {
                warn!(error = %e, "Key/value storage unavailable, token kept in cookie only");
                Ok(())
            }
            (Ok(()), Err(e)) => {
                warn!(error = %e, "Cookie jar unavailable, token kept in storage only");
                Ok(())
            }
            (Err(storage_err), Err(cookie_err)) => {
                error!(
                    storage_error = %storage_err,
                    cookie_error = %cookie_err,
                    "Credentials could not be persisted"
                );
                Err(AuthError::Storage(storage_err))
            }
        }
    }

    fn write_storage(&self, token: &SecretString, profile_json: &str) -> Result<(), StorageError> {
        self.storage.set(&self.config.token_key, token.expose())?;
        self.storage.set(&self.config.profile_key, profile_json)?;
        self.storage.set(&self.config.marker_key, "true")?;
        Ok(())
    }

    /// Load persisted credentials
    ///
    /// The storage copy of the token wins; the cookie copy is the fallback.
    pub fn load(&self) -> Option<StoredCredentials> {
        let token = self.load_token()?;
        let profile = self.load_profile();
        Some(StoredCredentials { token, profile })
    }

    fn load_token(&self) -> Option<SecretString> {
        let from_storage = match self.storage.get(&self.config.token_key) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Key/value storage unreadable, trying cookie");
                None
            }
        };
        if let Some(token) = from_storage.filter(|t| !t.trim().is_empty()) {
            return Some(SecretString::from(token));
        }

        match self.cookies.get(&self.config.token_key) {
            Ok(value) => value
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            Err(e) => {
                warn!(error = %e, "Cookie jar unreadable");
                None
            }
        }
    }

    fn load_profile(&self) -> Option<Profile> {
        let raw = self.storage.get(&self.config.profile_key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt cached profile");
                if let Err(e) = self.storage.remove(&self.config.profile_key) {
                    warn!(error = %e, "Failed to remove corrupt cached profile");
                }
                None
            }
        }
    }

    /// Remove every persisted credential from both backends
    ///
    /// Never fails; individual backend failures are logged.
    pub fn clear(&self) {
        for key in [
            &self.config.token_key,
            &self.config.profile_key,
            &self.config.marker_key,
            &self.config.reset_token_key,
        ] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key = %key, error = %e, "Failed to remove stored credential");
            }
        }
        if let Err(e) = self.cookies.remove(&self.config.token_cookie()) {
            warn!(error = %e, "Failed to expire token cookie");
        }
        debug!("Credentials cleared");
    }

    // ========================================================================
    // Reset capability
    // ========================================================================

    /// Persist the reset capability granted by OTP verification
    pub fn save_reset_token(&self, capability: &ResetCapability) -> AuthResult<()> {
        let record = ResetRecord {
            email: capability.email.as_str().to_string(),
            reset_token: capability.reset_token.expose().to_string(),
            issued_at: capability.issued_at,
            expires_in_minutes: capability.expires_in_minutes,
        };
        let json = serde_json::to_string(&record).map_err(StorageError::from)?;
        self.storage.set(&self.config.reset_token_key, &json)?;
        Ok(())
    }

    /// Load a persisted reset capability, if any
    pub fn load_reset_token(&self) -> Option<ResetCapability> {
        let raw = match self.storage.get(&self.config.reset_token_key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "Reset capability unreadable");
                return None;
            }
        };
        let record: ResetRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Discarding corrupt reset capability");
                self.clear_reset_token();
                return None;
            }
        };
        let Ok(email) = Email::new(record.email) else {
            self.clear_reset_token();
            return None;
        };
        Some(ResetCapability::issued_at(
            email,
            SecretString::from(record.reset_token),
            record.issued_at,
            record.expires_in_minutes,
        ))
    }

    /// Erase the reset capability
    pub fn clear_reset_token(&self) {
        if let Err(e) = self.storage.remove(&self.config.reset_token_key) {
            warn!(error = %e, "Failed to remove reset capability");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::profile::fixtures;
    use kernel::role::UserRole;
    use platform::cookie::MemoryCookieJar;
    use platform::storage::{FileStore, MemoryStore};

    struct Harness {
        storage: Arc<MemoryStore>,
        cookies: Arc<MemoryCookieJar>,
        store: CredentialStore,
    }

    fn harness() -> Harness {
        let storage = Arc::new(MemoryStore::new());
        let cookies = Arc::new(MemoryCookieJar::new());
        let store = CredentialStore::new(
            storage.clone(),
            cookies.clone(),
            Arc::new(AuthConfig::development()),
        );
        Harness {
            storage,
            cookies,
            store,
        }
    }

    #[test]
    fn test_save_writes_both_backends() {
        let h = harness();
        let profile = fixtures::profile("ops", UserRole::Admin);
        h.store.save(&SecretString::from("tok"), &profile).unwrap();

        assert_eq!(h.storage.get("authToken").unwrap().as_deref(), Some("tok"));
        assert_eq!(
            h.storage.get("isAuthenticated").unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(h.cookies.get("authToken").unwrap().as_deref(), Some("tok"));

        let loaded = h.store.load().unwrap();
        assert_eq!(loaded.token.expose(), "tok");
        assert_eq!(loaded.profile, Some(profile));
    }

    #[test]
    fn test_save_degraded_with_one_backend() {
        let h = harness();
        h.storage.set_blocked(true);
        let profile = fixtures::profile("ops", UserRole::Admin);
        assert!(h.store.save(&SecretString::from("tok"), &profile).is_ok());

        let loaded = h.store.load().unwrap();
        assert_eq!(loaded.token.expose(), "tok");
        assert!(loaded.profile.is_none());
    }

    #[test]
    fn test_save_fails_when_both_backends_fail() {
        let h = harness();
        h.storage.set_blocked(true);
        h.cookies.set_blocked(true);
        let profile = fixtures::profile("ops", UserRole::Admin);
        let err = h
            .store
            .save(&SecretString::from("tok"), &profile)
            .unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
    }

    #[test]
    fn test_load_prefers_storage_over_cookie() {
        let h = harness();
        h.storage.set("authToken", "from-storage").unwrap();
        h.cookies
            .set(&AuthConfig::development().token_cookie(), "from-cookie")
            .unwrap();
        assert_eq!(h.store.load().unwrap().token.expose(), "from-storage");
    }

    #[test]
    fn test_load_falls_back_to_cookie() {
        let h = harness();
        h.cookies
            .set(&AuthConfig::development().token_cookie(), "from-cookie")
            .unwrap();
        let loaded = h.store.load().unwrap();
        assert_eq!(loaded.token.expose(), "from-cookie");
        assert!(loaded.profile.is_none());
    }

    #[test]
    fn test_corrupt_profile_discarded_token_kept() {
        let h = harness();
        h.storage.set("authToken", "tok").unwrap();
        h.storage.set("user", "{not json").unwrap();

        let loaded = h.store.load().unwrap();
        assert_eq!(loaded.token.expose(), "tok");
        assert!(loaded.profile.is_none());
        assert_eq!(h.storage.get("user").unwrap(), None);
    }

    #[test]
    fn test_clear_then_load_is_absent_whichever_store_held_token() {
        // storage only
        let h = harness();
        h.storage.set("authToken", "tok").unwrap();
        h.store.clear();
        assert!(h.store.load().is_none());

        // cookie only
        let h = harness();
        h.cookies
            .set(&AuthConfig::development().token_cookie(), "tok")
            .unwrap();
        h.store.clear();
        assert!(h.store.load().is_none());

        // both
        let h = harness();
        let profile = fixtures::profile("ops", UserRole::Admin);
        h.store.save(&SecretString::from("tok"), &profile).unwrap();
        h.store.clear();
        assert!(h.store.load().is_none());
        assert!(h.storage.is_empty());
    }

    #[test]
    fn test_clear_never_fails_with_blocked_backends() {
        let h = harness();
        h.cookies
            .set(&AuthConfig::development().token_cookie(), "tok")
            .unwrap();
        h.storage.set_blocked(true);
        h.store.clear();
        h.storage.set_blocked(false);
        assert!(h.store.load().is_none());
    }

    #[test]
    fn test_reset_token_roundtrip_and_clear() {
        let h = harness();
        let cap = ResetCapability::new(
            Email::new("ops@example.com").unwrap(),
            SecretString::from("reset"),
            15,
        );
        h.store.save_reset_token(&cap).unwrap();

        let loaded = h.store.load_reset_token().unwrap();
        assert_eq!(loaded.reset_token.expose(), "reset");
        assert_eq!(loaded.email.as_str(), "ops@example.com");
        assert_eq!(loaded.expires_in_minutes, 15);

        h.store.clear_reset_token();
        assert!(h.store.load_reset_token().is_none());
    }

    #[test]
    fn test_clear_also_erases_reset_token() {
        let h = harness();
        let cap = ResetCapability::new(
            Email::new("ops@example.com").unwrap(),
            SecretString::from("reset"),
            15,
        );
        h.store.save_reset_token(&cap).unwrap();
        h.store.clear();
        assert!(h.store.load_reset_token().is_none());
    }

    #[test]
    fn test_failed_clear_agrees_with_restart() {
        let dir = std::env::temp_dir().join(format!("console-creds-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let config = Arc::new(AuthConfig::development());
        let open = || {
            CredentialStore::new(
                Arc::new(FileStore::open(&dir).unwrap()),
                Arc::new(MemoryCookieJar::new()),
                config.clone(),
            )
        };

        let store = open();
        let profile = fixtures::profile("ops", UserRole::Admin);
        store.save(&SecretString::from("old-token"), &profile).unwrap();

        // Every write fails while the temp file path is a directory
        let tmp = dir.join(FileStore::FILE_NAME).with_extension("json.tmp");
        std::fs::create_dir_all(&tmp).unwrap();
        store.clear();

        let in_process = store.load().map(|c| c.token.expose().to_string());
        let after_restart = open().load().map(|c| c.token.expose().to_string());
        assert_eq!(in_process, after_restart);

        std::fs::remove_dir_all(&tmp).unwrap();
        store.clear();
        assert!(store.load().is_none());
        assert!(open().load().is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
