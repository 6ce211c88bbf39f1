//! Caller identity as supplied by the invoking host.

use serde::{Deserialize, Serialize};

use super::id::UserId;
use super::role::UserRole;

/// An authenticated site user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Site user ID.
    pub id: UserId,
    /// Roles held by the user.
    #[serde(default)]
    pub roles: Vec<UserRole>,
}

impl UserIdentity {
    /// Create a new identity.
    #[must_use]
    pub const fn new(id: UserId, roles: Vec<UserRole>) -> Self {
        Self { id, roles }
    }

    /// Whether the user holds the given role.
    #[must_use]
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }
}

/// Whoever is invoking the tool.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Caller {
    /// No logged-in user.
    #[default]
    Anonymous,
    /// A logged-in user.
    User(UserIdentity),
}

impl Caller {
    /// Shorthand for an authenticated caller.
    #[must_use]
    pub const fn user(id: UserId, roles: Vec<UserRole>) -> Self {
        Self::User(UserIdentity::new(id, roles))
    }

    /// The identity, if the caller is authenticated.
    #[must_use]
    pub const fn identity(&self) -> Option<&UserIdentity> {
        match self {
            Self::Anonymous => None,
            Self::User(identity) => Some(identity),
        }
    }
}
