//! WordPress user roles relevant to tool access.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WordPress (or WooCommerce) user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Can only manage their own profile.
    Subscriber,
    /// WooCommerce customer account.
    Customer,
    Contributor,
    Author,
    Editor,
    /// WooCommerce store manager.
    ShopManager,
    /// Full site access.
    Administrator,
}

impl UserRole {
    /// All known roles, lowest privilege first.
    pub const ALL: [Self; 7] = [
        Self::Subscriber,
        Self::Customer,
        Self::Contributor,
        Self::Author,
        Self::Editor,
        Self::ShopManager,
        Self::Administrator,
    ];

    /// The snake_case name used by WordPress.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Subscriber => "subscriber",
            Self::Customer => "customer",
            Self::Contributor => "contributor",
            Self::Author => "author",
            Self::Editor => "editor",
            Self::ShopManager => "shop_manager",
            Self::Administrator => "administrator",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid user role: {0}")]
pub struct RoleParseError(pub String);

impl std::str::FromStr for UserRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| RoleParseError(s.to_owned()))
    }
}
