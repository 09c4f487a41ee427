//! HTTP middleware for the search API.
//!
//! - [`privileges`] - Privilege checks in front of the database routes

pub mod privileges;

pub use privileges::{Principal, Privilege, PrivilegeGuard, require_privilege};
