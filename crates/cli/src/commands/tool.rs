//! Tool commands.
//!
//! # Usage
//!
//! ```bash
//! # Print the MCP registration record
//! mcp-premium tool describe
//!
//! # Run the tool as an anonymous caller
//! mcp-premium tool invoke "refund policy"
//!
//! # Run the tool as user 7 holding the customer role
//! mcp-premium tool invoke "refund policy" --user 7 --role customer
//! ```
//!
//! # Environment Variables
//!
//! - `MCP_VECTOR_STORE_ID` - Vector store to search (required for `invoke`)
//! - `MCP_PRODUCT_ID`, `MCP_ACCESS_POLICY`, `MCP_PURCHASES_PATH`, `MCP_SHOP_URL` - Access control

use mcp_premium_core::{Caller, UserId, UserRole};
use mcp_premium_tool::{PremiumConfig, tool_definition};

use super::CommandError;

/// Print the tool registration record.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
pub fn describe() -> Result<(), CommandError> {
    let rendered =
        serde_json::to_string_pretty(&tool_definition()).map_err(CommandError::Output)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}

/// Run the tool for a caller and print the response.
///
/// Access denials and search failures are part of the printed response, not
/// command errors.
///
/// # Errors
///
/// Returns an error if the caller arguments are invalid or the tool cannot be
/// configured.
pub async fn invoke(
    config: &PremiumConfig,
    query: &str,
    user: Option<&str>,
    roles: &[String],
) -> Result<(), CommandError> {
    let caller = build_caller(user, roles)?;
    let invoker = config.tool_invoker()?;

    tracing::debug!(?caller, "invoking search tool");
    let response = invoker.invoke(query, &caller).await;

    let rendered =
        serde_json::to_string_pretty(&response.to_json()).map_err(CommandError::Output)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}

fn build_caller(user: Option<&str>, roles: &[String]) -> Result<Caller, CommandError> {
    let Some(user) = user else {
        if !roles.is_empty() {
            tracing::warn!("--role has no effect without --user; invoking anonymously");
        }
        return Ok(Caller::Anonymous);
    };

    let id: UserId = user
        .parse()
        .map_err(|_| CommandError::InvalidUserId(user.to_owned()))?;
    let roles = roles
        .iter()
        .map(|role| role.parse::<UserRole>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Caller::user(id, roles))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_caller_anonymous() {
        assert_eq!(build_caller(None, &[]).unwrap(), Caller::Anonymous);
        assert_eq!(
            build_caller(None, &["editor".to_string()]).unwrap(),
            Caller::Anonymous
        );
    }

    #[test]
    fn test_build_caller_with_roles() {
        let caller = build_caller(
            Some("7"),
            &["customer".to_string(), "shop-manager".to_string()],
        )
        .unwrap();
        assert_eq!(
            caller,
            Caller::user(
                UserId::new(7),
                vec![UserRole::Customer, UserRole::ShopManager]
            )
        );
    }

    #[test]
    fn test_build_caller_rejects_bad_input() {
        assert!(matches!(
            build_caller(Some("seven"), &[]),
            Err(CommandError::InvalidUserId(_))
        ));
        assert!(matches!(
            build_caller(Some("7"), &["pirate".to_string()]),
            Err(CommandError::InvalidRole(_))
        ));
    }
}
