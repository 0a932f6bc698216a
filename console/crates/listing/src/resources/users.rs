//! User list

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::role::UserRole;
use platform::secret::SecretString;
use serde::{Deserialize, Serialize, Serializer};

use crate::application::controller::ResourceListController;
use crate::domain::mutation::{Mutation, MutationSink, record_path};
use crate::domain::query::SortDirection;
use crate::domain::resource::{Resource, Vocabulary};
use crate::domain::source::ListSource;
use crate::error::{ListError, ListResult};
use crate::resources::require_len;

pub const ROLE: &str = "role";
pub const IS_ACTIVE: &str = "is_active";

/// Operator account row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const MIN_PASSWORD: usize = 8;

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose())
}

fn expose_opt<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => serializer.serialize_some(secret.expose()),
        None => serializer.serialize_none(),
    }
}

fn check_email(email: &str) -> ListResult<()> {
    require_len("Email", email, 1)?;
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ListError::InvalidValue("Invalid email address".into())),
    }
}

fn check_password(password: &SecretString) -> ListResult<()> {
    if password.is_blank() {
        return Err(ListError::InvalidValue("Password is required".into()));
    }
    if password.expose().chars().count() < MIN_PASSWORD {
        return Err(ListError::InvalidValue(format!(
            "Password must be at least {MIN_PASSWORD} characters"
        )));
    }
    Ok(())
}

/// New operator account
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub full_name: String,
    pub role: UserRole,
    pub is_active: bool,
}

impl NewUser {
    pub fn validate(&self) -> ListResult<()> {
        require_len("Username", &self.username, 3)?;
        check_email(&self.email)?;
        check_password(&self.password)?;
        require_len("Full name", &self.full_name, 2)
    }
}

/// Partial account update; a password is sent only when changing it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_opt"
    )]
    pub password: Option<SecretString>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl UserPatch {
    pub fn validate(&self) -> ListResult<()> {
        if *self == Self::default() {
            return Err(ListError::InvalidValue("Nothing to update".into()));
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        if let Some(password) = &self.password {
            check_password(password)?;
        }
        if let Some(full_name) = &self.full_name {
            require_len("Full name", full_name, 2)?;
        }
        Ok(())
    }
}

pub struct Users;

impl Resource for Users {
    type Item = UserSummary;
    const PATH: &'static str = "/api/users";
    const ITEMS_KEY: &'static str = "users";
    const VOCABULARY: Vocabulary = Vocabulary {
        resource: "users",
        filters: &[ROLE, IS_ACTIVE],
        sort_keys: &[
            "username",
            "email",
            "full_name",
            "role",
            "created_at",
            "updated_at",
            "last_login_at",
        ],
        searchable: true,
        default_sort: Some(("created_at", SortDirection::Desc)),
        default_page_size: 10,
    };
}

impl<S> ResourceListController<Users, S>
where
    S: ListSource<Users>,
{
    pub async fn set_role(&self, role: Option<UserRole>) -> ListResult<()> {
        self.set_filters(&[(ROLE, role.map(|r| r.as_str()))]).await
    }

    pub async fn set_active(&self, active: Option<bool>) -> ListResult<()> {
        let value = active.map(|v| if v { "true" } else { "false" });
        self.set_filters(&[(IS_ACTIVE, value)]).await
    }
}

impl<S> ResourceListController<Users, S>
where
    S: ListSource<Users> + MutationSink,
{
    pub async fn create_user(&self, user: &NewUser) -> ListResult<()> {
        user.validate()?;
        self.submit(Mutation::post(Users::PATH, user)?, "User created successfully")
            .await
    }

    pub async fn update_user(&self, id: &UserId, patch: &UserPatch) -> ListResult<()> {
        patch.validate()?;
        let path = record_path(Users::PATH, id.as_str());
        self.submit(Mutation::put(path, patch)?, "User updated successfully")
            .await
    }

    pub async fn delete_user(&self, id: &UserId) -> ListResult<()> {
        let path = record_path(Users::PATH, id.as_str());
        self.submit(Mutation::delete(path), "User deleted successfully")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::ListConfig;
    use crate::domain::query::ResourceQuery;
    use crate::domain::result::{Page, Pagination};
    use crate::domain::mutation::Method;
    use kernel::error::app_error::AppResult;
    use parking_lot::Mutex;
    use platform::notify::MemoryNotifier;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Default)]
    struct AccountSource {
        writes: Mutex<Vec<Mutation>>,
    }

    impl ListSource<Users> for AccountSource {
        async fn fetch(&self, _query: &ResourceQuery) -> AppResult<Page<UserSummary>> {
            Ok(Page {
                items: Vec::new(),
                pagination: Pagination::default(),
            })
        }
    }

    impl MutationSink for AccountSource {
        async fn apply(&self, mutation: &Mutation) -> AppResult<()> {
            self.writes.lock().push(mutation.clone());
            Ok(())
        }
    }

    fn account_controller() -> (Arc<AccountSource>, ResourceListController<Users, AccountSource>) {
        let source = Arc::new(AccountSource::default());
        let controller = ResourceListController::new(
            source.clone(),
            Arc::new(MemoryNotifier::new()),
            Arc::new(ListConfig::default()),
        );
        (source, controller)
    }

    fn new_user() -> NewUser {
        NewUser {
            username: "sara".into(),
            email: "sara@example.com".into(),
            password: SecretString::new("correct-horse"),
            full_name: "Sara A.".into(),
            role: UserRole::CustomerSupport,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_user_sends_password() {
        let (source, c) = account_controller();
        c.create_user(&new_user()).await.unwrap();

        let writes = source.writes.lock().clone();
        assert_eq!(writes[0].method, Method::Post);
        assert_eq!(writes[0].path, "/api/users");
        assert_eq!(
            writes[0].body,
            Some(json!({
                "username": "sara",
                "email": "sara@example.com",
                "password": "correct-horse",
                "full_name": "Sara A.",
                "role": "customer_support",
                "is_active": true
            }))
        );
        assert!(!format!("{:?}", new_user()).contains("correct-horse"));
    }

    #[tokio::test]
    async fn test_invalid_account_is_rejected_locally() {
        let (source, c) = account_controller();
        let short = NewUser {
            password: SecretString::new("short"),
            ..new_user()
        };
        let err = c.create_user(&short).await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 8 characters");

        let bad_email = UserPatch {
            email: Some("sara".into()),
            ..UserPatch::default()
        };
        let err = c.update_user(&UserId::new("u-1"), &bad_email).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email address");
        assert!(source.writes.lock().is_empty());
    }

    #[tokio::test]
    async fn test_update_without_password_omits_it() {
        let (source, c) = account_controller();
        let id = UserId::new("u-1");
        let patch = UserPatch {
            role: Some(UserRole::Admin),
            ..UserPatch::default()
        };
        c.update_user(&id, &patch).await.unwrap();
        c.delete_user(&id).await.unwrap();

        let writes = source.writes.lock().clone();
        assert_eq!(writes[0].path, "/api/users/u-1");
        assert_eq!(writes[0].body, Some(json!({ "role": "admin" })));
        assert_eq!(writes[1].method, Method::Delete);
    }

    struct EmptySource;

    impl ListSource<Users> for EmptySource {
        async fn fetch(&self, _query: &ResourceQuery) -> AppResult<Page<UserSummary>> {
            Ok(Page {
                items: Vec::new(),
                pagination: Pagination::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_role_filter_and_sort() {
        let c = ResourceListController::<Users, _>::new(
            Arc::new(EmptySource),
            Arc::new(MemoryNotifier::new()),
            Arc::new(ListConfig::default()),
        );
        c.set_role(Some(UserRole::CustomerSupport)).await.unwrap();
        c.set_active(Some(true)).await.unwrap();
        c.set_sort("last_login_at", SortDirection::Asc).await.unwrap();

        let params = c.query().to_params();
        assert!(params.contains(&("role".into(), "customer_support".into())));
        assert!(params.contains(&("is_active".into(), "true".into())));
        assert!(params.contains(&("sort_by".into(), "last_login_at".into())));
        assert!(params.contains(&("sort_order".into(), "asc".into())));
    }

    #[test]
    fn test_defaults() {
        let query = ResourceQuery::defaults(&Users::VOCABULARY);
        assert_eq!(query.page_size(), 10);
        assert_eq!(query.sort().map(|s| s.key.as_str()), Some("created_at"));
    }

    #[test]
    fn test_row_deserialize() {
        let user: UserSummary = serde_json::from_value(json!({
            "_id": "u-1",
            "username": "sara",
            "email": "sara@example.com",
            "full_name": "Sara A.",
            "role": "admin",
            "is_active": true,
            "last_login_at": null,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.last_login_at.is_none());
    }
}
