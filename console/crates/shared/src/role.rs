//! Operator roles
//!
//! Defines [`UserRole`], shared by session gating and the user listing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// コンソール操作者のロール
///
/// ## Notes
/// * ワイヤー表現は snake_case (`admin`, `customer_support`)
/// * ロールごとにホーム画面が決まっている
///
/// ## Examples
/// ```rust
/// use kernel::role::UserRole;
///
/// let role: UserRole = "customer_support".parse().unwrap();
/// assert_eq!(role.home_path(), "/faqs");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// 全画面にアクセス可能な管理者
    Admin,
    /// FAQ と FAQ 提案のみ扱うサポート担当
    CustomerSupport,
}

impl UserRole {
    /// 全ロール
    pub const ALL: [UserRole; 2] = [UserRole::Admin, UserRole::CustomerSupport];

    /// ワイヤー表現
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::CustomerSupport => "customer_support",
        }
    }

    /// ロールごとのホーム画面パス
    ///
    /// ホーム画面は必ずそのロールで表示可能でなければならない。
    pub const fn home_path(&self) -> &'static str {
        match self {
            UserRole::Admin => "/dashboard",
            UserRole::CustomerSupport => "/faqs",
        }
    }

    /// 表示名
    pub const fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::CustomerSupport => "Customer Support",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知のロール文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(UserRole::Admin),
            "customer_support" => Ok(UserRole::CustomerSupport),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roles() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!(
            " customer_support ".parse::<UserRole>().unwrap(),
            UserRole::CustomerSupport
        );
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&UserRole::CustomerSupport).unwrap();
        assert_eq!(json, "\"customer_support\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }

    #[test]
    fn test_home_paths() {
        assert_eq!(UserRole::Admin.home_path(), "/dashboard");
        assert_eq!(UserRole::CustomerSupport.home_path(), "/faqs");
    }
}
