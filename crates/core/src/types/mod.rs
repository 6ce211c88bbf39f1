//! Core types for Model Context Premium.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod caller;
pub mod id;
pub mod role;
pub mod search;

pub use caller::{Caller, UserIdentity};
pub use id::*;
pub use role::{RoleParseError, UserRole};
pub use search::*;
