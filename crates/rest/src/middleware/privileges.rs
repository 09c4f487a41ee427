//! Search privilege checks.
//!
//! Every database route group sits behind [`require_privilege`]. The
//! authenticated [`Principal`] is placed into the request extensions by the
//! authentication layer in front of this service; this module only checks it.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//! use firmscope_rest::middleware::privileges::{require_privilege, Privilege, PrivilegeGuard};
//!
//! let routes = Router::new()
//!     .route("/database/browse", get(browse))
//!     .layer(from_fn_with_state(
//!         PrivilegeGuard::new(Privilege::BasicSearch, true),
//!         require_privilege,
//!     ));
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RestError;

/// A capability required by a group of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// Browse, basic search and quick search.
    BasicSearch,
    /// Raw JSON queries.
    AdvancedSearch,
    /// Binary pattern (YARA) search.
    PatternSearch,
}

impl Privilege {
    /// Returns the privilege name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Privilege::BasicSearch => "basic_search",
            Privilege::AdvancedSearch => "advanced_search",
            Privilege::PatternSearch => "pattern_search",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privilege {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic_search" => Ok(Privilege::BasicSearch),
            "advanced_search" => Ok(Privilege::AdvancedSearch),
            "pattern_search" => Ok(Privilege::PatternSearch),
            other => Err(format!("unknown privilege: {}", other)),
        }
    }
}

/// The authenticated caller and the privileges it holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    name: String,
    privileges: BTreeSet<Privilege>,
}

impl Principal {
    /// Creates a principal without privileges.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            privileges: BTreeSet::new(),
        }
    }

    /// Creates a principal holding every privilege.
    pub fn with_all_privileges(name: impl Into<String>) -> Self {
        Self::new(name)
            .with_privilege(Privilege::BasicSearch)
            .with_privilege(Privilege::AdvancedSearch)
            .with_privilege(Privilege::PatternSearch)
    }

    /// Grants a privilege.
    pub fn with_privilege(mut self, privilege: Privilege) -> Self {
        self.privileges.insert(privilege);
        self
    }

    /// Returns the principal's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if the principal holds the privilege.
    pub fn has(&self, privilege: Privilege) -> bool {
        self.privileges.contains(&privilege)
    }
}

/// State of the [`require_privilege`] middleware.
#[derive(Debug, Clone, Copy)]
pub struct PrivilegeGuard {
    privilege: Privilege,
    enabled: bool,
}

impl PrivilegeGuard {
    /// Creates a guard for the privilege. A disabled guard lets every request through.
    pub fn new(privilege: Privilege, enabled: bool) -> Self {
        Self { privilege, enabled }
    }

    /// Checks a request's principal against the guarded privilege.
    pub fn check(&self, principal: Option<&Principal>) -> Result<(), RestError> {
        if !self.enabled {
            return Ok(());
        }
        let principal = principal.ok_or_else(|| RestError::Unauthorized {
            message: "Authentication required".to_string(),
        })?;
        if principal.has(self.privilege) {
            Ok(())
        } else {
            debug!(
                principal = principal.name(),
                privilege = %self.privilege,
                "Missing privilege"
            );
            Err(RestError::Forbidden {
                message: format!("Privilege '{}' required", self.privilege),
            })
        }
    }
}

/// Middleware rejecting requests whose principal lacks the guarded privilege.
///
/// This can be used with `axum::middleware::from_fn_with_state`.
pub async fn require_privilege(
    State(guard): State<PrivilegeGuard>,
    request: Request,
    next: Next,
) -> Result<Response, RestError> {
    guard.check(request.extensions().get::<Principal>())?;
    Ok(next.run(request).await)
}
