//! Access control for the search tool.
//!
//! A single [`AccessGate`] covers every deployment variant through its
//! [`AccessPolicy`]:
//!
//! | Policy | Anonymous | Authenticated |
//! |--------|-----------|---------------|
//! | `AllowAll` | allowed | allowed |
//! | `AdministratorOnly` | denied | `administrator` role only |
//! | `PurchaseOrRole` | denied (with purchase link) | purchased the product, or holds a bypass role |
//!
//! Purchase lookups go through the injected [`Entitlements`] trait; the gate
//! itself performs no I/O.

mod ledger;

use std::str::FromStr;
use std::sync::Arc;

use mcp_premium_core::{Caller, ProductId, UserId, UserRole};
use thiserror::Error;

pub use ledger::{LedgerError, PurchaseLedger};

/// Roles that may use the tool without a purchase, by default.
///
/// `customer` is deliberately absent: it is the role a buyer receives, so
/// holding it says nothing about owning this particular product.
pub const DEFAULT_BYPASS_ROLES: [UserRole; 5] = [
    UserRole::Contributor,
    UserRole::Author,
    UserRole::Editor,
    UserRole::ShopManager,
    UserRole::Administrator,
];

/// Purchase lookups supplied by the store.
pub trait Entitlements: Send + Sync {
    /// Whether `user` has bought `product`.
    fn has_purchased(&self, user: UserId, product: ProductId) -> bool;

    /// Where `product` can be bought, if known.
    fn purchase_url(&self, product: ProductId) -> Option<String>;
}

/// Who may invoke the tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// No restriction.
    AllowAll,
    /// Administrators only.
    AdministratorOnly,
    /// Buyers of the product, or holders of a bypass role.
    PurchaseOrRole {
        /// Roles that skip the purchase check.
        bypass_roles: Vec<UserRole>,
    },
}

impl AccessPolicy {
    /// Purchase gating with [`DEFAULT_BYPASS_ROLES`].
    #[must_use]
    pub fn purchase() -> Self {
        Self::PurchaseOrRole {
            bypass_roles: DEFAULT_BYPASS_ROLES.to_vec(),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::purchase()
    }
}

/// Error returned when parsing an unknown policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid access policy: {0}. Valid policies: allow_all, administrator, purchase")]
pub struct PolicyParseError(pub String);

impl FromStr for AccessPolicy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow_all" | "open" => Ok(Self::AllowAll),
            "administrator" | "admin" => Ok(Self::AdministratorOnly),
            "purchase" => Ok(Self::purchase()),
            _ => Err(PolicyParseError(s.to_owned())),
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied {
        /// Where the caller can buy access, when derivable.
        purchase_url: Option<String>,
    },
}

impl AccessDecision {
    /// Whether the caller may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Decides whether a caller may run the search tool.
#[derive(Clone)]
pub struct AccessGate {
    policy: AccessPolicy,
    entitlements: Arc<dyn Entitlements>,
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    /// Create a gate.
    #[must_use]
    pub fn new(policy: AccessPolicy, entitlements: Arc<dyn Entitlements>) -> Self {
        Self {
            policy,
            entitlements,
        }
    }

    /// The configured policy.
    #[must_use]
    pub const fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Decide whether `caller` may search content gated by `product`.
    #[must_use]
    pub fn authorize(&self, caller: &Caller, product: ProductId) -> AccessDecision {
        let decision = match &self.policy {
            AccessPolicy::AllowAll => AccessDecision::Allowed,
            AccessPolicy::AdministratorOnly => match caller.identity() {
                Some(user) if user.has_role(UserRole::Administrator) => AccessDecision::Allowed,
                _ => AccessDecision::Denied { purchase_url: None },
            },
            AccessPolicy::PurchaseOrRole { bypass_roles } => match caller.identity() {
                Some(user) if bypass_roles.iter().any(|role| user.has_role(*role)) => {
                    AccessDecision::Allowed
                }
                Some(user) if self.entitlements.has_purchased(user.id, product) => {
                    AccessDecision::Allowed
                }
                _ => AccessDecision::Denied {
                    purchase_url: self.entitlements.purchase_url(product),
                },
            },
        };

        tracing::debug!(
            policy = ?self.policy,
            user_id = caller.identity().map(|u| u.id.as_u64()),
            product_id = product.as_u64(),
            allowed = decision.is_allowed(),
            "access decision"
        );
        decision
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;

    const PRODUCT: ProductId = ProductId::new(14);

    struct FakeEntitlements {
        purchases: HashMap<UserId, HashSet<ProductId>>,
        url: Option<String>,
    }

    impl Entitlements for FakeEntitlements {
        fn has_purchased(&self, user: UserId, product: ProductId) -> bool {
            self.purchases
                .get(&user)
                .is_some_and(|products| products.contains(&product))
        }

        fn purchase_url(&self, product: ProductId) -> Option<String> {
            self.url
                .as_ref()
                .map(|base| format!("{base}?add-to-cart={product}"))
        }
    }

    fn gate(policy: AccessPolicy) -> AccessGate {
        let mut purchases = HashMap::new();
        purchases.insert(UserId::new(1), HashSet::from([PRODUCT]));
        AccessGate::new(
            policy,
            Arc::new(FakeEntitlements {
                purchases,
                url: Some("https://shop.example.com/".to_string()),
            }),
        )
    }

    fn customer(id: u64) -> Caller {
        Caller::user(UserId::new(id), vec![UserRole::Customer])
    }

    #[test]
    fn test_allow_all_admits_anonymous() {
        let gate = gate(AccessPolicy::AllowAll);
        assert!(gate.authorize(&Caller::Anonymous, PRODUCT).is_allowed());
        assert!(gate.authorize(&customer(2), PRODUCT).is_allowed());
    }

    #[test]
    fn test_administrator_only() {
        let gate = gate(AccessPolicy::AdministratorOnly);
        let admin = Caller::user(UserId::new(3), vec![UserRole::Administrator]);
        assert!(gate.authorize(&admin, PRODUCT).is_allowed());
        assert_eq!(
            gate.authorize(&customer(1), PRODUCT),
            AccessDecision::Denied { purchase_url: None }
        );
        assert!(!gate.authorize(&Caller::Anonymous, PRODUCT).is_allowed());
    }

    #[test]
    fn test_purchasing_customer_is_allowed() {
        let gate = gate(AccessPolicy::purchase());
        assert!(gate.authorize(&customer(1), PRODUCT).is_allowed());
    }

    #[test]
    fn test_non_purchasing_customer_gets_purchase_link() {
        let gate = gate(AccessPolicy::purchase());
        match gate.authorize(&customer(2), PRODUCT) {
            AccessDecision::Denied {
                purchase_url: Some(url),
            } => {
                assert!(!url.is_empty());
                assert!(url.contains("add-to-cart=14"));
            }
            other => panic!("expected denial with link, got {other:?}"),
        }
    }

    #[test]
    fn test_purchase_is_per_product() {
        let gate = gate(AccessPolicy::purchase());
        assert!(
            !gate
                .authorize(&customer(1), ProductId::new(15))
                .is_allowed()
        );
    }

    #[test]
    fn test_anonymous_denied_under_purchase_policy() {
        let gate = gate(AccessPolicy::purchase());
        assert!(!gate.authorize(&Caller::Anonymous, PRODUCT).is_allowed());
    }

    #[test]
    fn test_bypass_roles_skip_purchase() {
        let gate = gate(AccessPolicy::purchase());
        for role in DEFAULT_BYPASS_ROLES {
            let caller = Caller::user(UserId::new(99), vec![role]);
            assert!(gate.authorize(&caller, PRODUCT).is_allowed(), "{role} should bypass");
        }
        let subscriber = Caller::user(UserId::new(99), vec![UserRole::Subscriber]);
        assert!(!gate.authorize(&subscriber, PRODUCT).is_allowed());
    }

    #[test]
    fn test_custom_bypass_roles() {
        let gate = gate(AccessPolicy::PurchaseOrRole {
            bypass_roles: vec![UserRole::Customer],
        });
        assert!(gate.authorize(&customer(2), PRODUCT).is_allowed());
        let editor = Caller::user(UserId::new(5), vec![UserRole::Editor]);
        assert!(!gate.authorize(&editor, PRODUCT).is_allowed());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "allow_all".parse::<AccessPolicy>(),
            Ok(AccessPolicy::AllowAll)
        );
        assert_eq!(
            "Administrator".parse::<AccessPolicy>(),
            Ok(AccessPolicy::AdministratorOnly)
        );
        assert_eq!(
            "purchase".parse::<AccessPolicy>(),
            Ok(AccessPolicy::purchase())
        );
        assert!("everyone".parse::<AccessPolicy>().is_err());
    }
}
