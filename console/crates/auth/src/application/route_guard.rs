//! Route Guard
//!
//! Decides whether a view may render for the current session and role.
//! A session that is still being confirmed yields [`RouteDecision::Pending`],
//! never a redirect.

use kernel::role::UserRole;

use crate::domain::entity::session::Session;

/// Path of the login screen
pub const LOGIN_PATH: &str = "/login";

/// Outcome of a route check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show the requested view
    Render,
    /// Show a neutral loading placeholder
    Pending,
    /// Navigate to the login screen
    RedirectLogin,
    /// Navigate to the role's home screen
    RedirectHome(&'static str),
}

/// Role-based gate for protected views
#[derive(Debug, Default, Clone, Copy)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decide for a protected view
    ///
    /// `required_roles` of `None` (or empty) admits any authenticated role.
    pub fn decide(session: &Session, required_roles: Option<&[UserRole]>) -> RouteDecision {
        match session {
            Session::Verifying => RouteDecision::Pending,
            Session::Authenticated { profile, .. } => match required_roles {
                Some(roles) if !roles.is_empty() && !roles.contains(&profile.role) => {
                    RouteDecision::RedirectHome(profile.role.home_path())
                }
                _ => RouteDecision::Render,
            },
            Session::Anonymous { .. } | Session::Error { .. } => RouteDecision::RedirectLogin,
        }
    }

    /// Decide for a public view (login, forgot password)
    ///
    /// Signed-in operators are sent home.
    pub fn decide_public(session: &Session) -> RouteDecision {
        match session {
            Session::Verifying => RouteDecision::Pending,
            Session::Authenticated { profile, .. } => {
                RouteDecision::RedirectHome(profile.role.home_path())
            }
            Session::Anonymous { .. } | Session::Error { .. } => RouteDecision::Render,
        }
    }
}

const ALL_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::CustomerSupport];
const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Route access rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    Protected(&'static [UserRole]),
}

/// A console route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    /// Path pattern; `:name` segments match any single segment
    pub pattern: &'static str,
    pub label: &'static str,
    pub access: RouteAccess,
    /// Shown in the navigation sidebar
    pub in_nav: bool,
}

impl RouteDef {
    const fn public(pattern: &'static str, label: &'static str) -> Self {
        Self {
            pattern,
            label,
            access: RouteAccess::Public,
            in_nav: false,
        }
    }

    const fn protected(
        pattern: &'static str,
        label: &'static str,
        roles: &'static [UserRole],
        in_nav: bool,
    ) -> Self {
        Self {
            pattern,
            label,
            access: RouteAccess::Protected(roles),
            in_nav,
        }
    }

    /// Whether `path` matches this route's pattern
    pub fn matches(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let mut expected = self.pattern.split('/');
        let mut actual = path.split('/');
        loop {
            match (expected.next(), actual.next()) {
                (None, None) => return true,
                (Some(e), Some(a)) if e.starts_with(':') && !a.is_empty() => continue,
                (Some(e), Some(a)) if e == a => continue,
                _ => return false,
            }
        }
    }

    pub fn allows(&self, role: UserRole) -> bool {
        match self.access {
            RouteAccess::Public => true,
            RouteAccess::Protected(roles) => roles.contains(&role),
        }
    }
}

/// Console route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::console()
    }
}

impl RouteTable {
    /// Routes of the support console
    pub fn console() -> Self {
        Self {
            routes: vec![
                RouteDef::public(LOGIN_PATH, "Sign in"),
                RouteDef::public("/forgot-password", "Forgot password"),
                RouteDef::public("/forgot-password/new-password", "New password"),
                RouteDef::protected("/", "Dashboard", ADMIN_ONLY, false),
                RouteDef::protected("/dashboard", "Dashboard", ADMIN_ONLY, true),
                RouteDef::protected("/conversations", "Conversations", ADMIN_ONLY, true),
                RouteDef::protected("/conversations/:id", "Conversation", ADMIN_ONLY, false),
                RouteDef::protected("/analytics", "Analytics", ADMIN_ONLY, true),
                RouteDef::protected("/users", "Users", ADMIN_ONLY, true),
                RouteDef::protected("/faqs", "FAQs", ALL_ROLES, true),
                RouteDef::protected("/suggestions", "FAQ Suggestions", ALL_ROLES, true),
                RouteDef::protected("/training", "Training", ADMIN_ONLY, true),
                RouteDef::protected("/settings", "Settings", ADMIN_ONLY, true),
            ],
        }
    }

    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// Find the route matching `path`
    pub fn resolve(&self, path: &str) -> Option<&RouteDef> {
        self.routes.iter().find(|route| route.matches(path))
    }

    /// Decide for a concrete path
    ///
    /// Unknown paths are treated as protected views open to any role.
    pub fn decide(&self, session: &Session, path: &str) -> RouteDecision {
        match self.resolve(path).map(|route| route.access) {
            Some(RouteAccess::Public) => RouteGuard::decide_public(session),
            Some(RouteAccess::Protected(roles)) => RouteGuard::decide(session, Some(roles)),
            None => RouteGuard::decide(session, None),
        }
    }

    /// Navigation entries visible to `role`
    pub fn navigable_for(&self, role: UserRole) -> Vec<&RouteDef> {
        self.routes
            .iter()
            .filter(|route| route.in_nav && route.allows(role))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::profile::fixtures;
    use crate::error::AuthError;
    use platform::secret::SecretString;
    use std::sync::Arc;

    fn signed_in(role: UserRole) -> Session {
        Session::authenticated(
            Arc::new(fixtures::profile("op", role)),
            SecretString::from("t"),
        )
    }

    #[test]
    fn test_verifying_is_pending_never_redirect() {
        assert_eq!(
            RouteGuard::decide(&Session::verifying(), Some(ADMIN_ONLY)),
            RouteDecision::Pending
        );
        assert_eq!(
            RouteGuard::decide_public(&Session::verifying()),
            RouteDecision::Pending
        );
    }

    #[test]
    fn test_not_authenticated_redirects_login() {
        assert_eq!(
            RouteGuard::decide(&Session::anonymous(), None),
            RouteDecision::RedirectLogin
        );
        let failed = Session::failed(&AuthError::Network("down".into()));
        assert_eq!(
            RouteGuard::decide(&failed, None),
            RouteDecision::RedirectLogin
        );
    }

    #[test]
    fn test_customer_support_on_users_goes_to_faqs() {
        let table = RouteTable::console();
        let session = signed_in(UserRole::CustomerSupport);
        assert_eq!(
            table.decide(&session, "/users"),
            RouteDecision::RedirectHome("/faqs")
        );
        assert_eq!(table.decide(&session, "/faqs"), RouteDecision::Render);
        assert_eq!(table.decide(&session, "/suggestions"), RouteDecision::Render);
        assert_eq!(
            table.decide(&session, "/conversations/abc"),
            RouteDecision::RedirectHome("/faqs")
        );
    }

    #[test]
    fn test_admin_renders_everything() {
        let table = RouteTable::console();
        let session = signed_in(UserRole::Admin);
        for route in table.routes() {
            if matches!(route.access, RouteAccess::Protected(_)) {
                let path = route.pattern.replace(":id", "42");
                assert_eq!(table.decide(&session, &path), RouteDecision::Render);
            }
        }
    }

    #[test]
    fn test_home_is_always_renderable() {
        let table = RouteTable::console();
        for role in UserRole::ALL {
            let session = signed_in(role);
            assert_eq!(
                table.decide(&session, role.home_path()),
                RouteDecision::Render
            );
        }
    }

    #[test]
    fn test_public_routes_redirect_signed_in_home() {
        let table = RouteTable::console();
        assert_eq!(
            table.decide(&signed_in(UserRole::Admin), "/login"),
            RouteDecision::RedirectHome("/dashboard")
        );
        assert_eq!(
            table.decide(&Session::anonymous(), "/forgot-password/new-password"),
            RouteDecision::Render
        );
    }

    #[test]
    fn test_pattern_matching() {
        let table = RouteTable::console();
        assert_eq!(
            table.resolve("/conversations/66ab?tab=messages").map(|r| r.pattern),
            Some("/conversations/:id")
        );
        assert_eq!(table.resolve("/faqs/").map(|r| r.pattern), Some("/faqs"));
        assert!(table.resolve("/conversations/").is_some());
        assert!(table.resolve("/nope").is_none());
    }

    #[test]
    fn test_unknown_path_needs_authentication_only() {
        let table = RouteTable::console();
        assert_eq!(
            table.decide(&Session::anonymous(), "/nope"),
            RouteDecision::RedirectLogin
        );
        assert_eq!(
            table.decide(&signed_in(UserRole::CustomerSupport), "/nope"),
            RouteDecision::Render
        );
    }

    #[test]
    fn test_navigable_for_role() {
        let table = RouteTable::console();
        let labels: Vec<_> = table
            .navigable_for(UserRole::CustomerSupport)
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["FAQs", "FAQ Suggestions"]);
        assert_eq!(table.navigable_for(UserRole::Admin).len(), 8);
    }
}
