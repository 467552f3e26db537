//! Role-based access control
//!
//! Authentication happens upstream (a gateway or auth service). By the
//! time a request reaches the shop it carries a verified [`Identity`]:
//! the user id and a single [`Role`]. This module decides what that
//! identity may do:
//! - `Admin` satisfies every requirement
//! - `Customer` satisfies only `Customer`
//! - ownership checks compare the identity with a resource's owner

use crate::core::error::ShopError;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the authenticated user's role
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The role attached to an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Admin => "ADMIN",
        }
    }

    /// Whether this role meets `required`
    pub fn satisfies(self, required: Role) -> bool {
        matches!(
            (self, required),
            (Role::Admin, _) | (Role::Customer, Role::Customer)
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CUSTOMER" => Ok(Role::Customer),
            "ADMIN" => Ok(Role::Admin),
            other => Err(ShopError::invalid_input(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// An authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn customer(user_id: Uuid) -> Self {
        Self::new(user_id, Role::Customer)
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Caller's role must satisfy this role
    HasRole(Role),

    /// Caller must be the owner of the resource
    Owner(Uuid),

    /// Combination of policies (OR)
    Or(Vec<AuthPolicy>),
}

impl AuthPolicy {
    /// Owner of the resource, or any admin
    pub fn owner_or_admin(owner_id: Uuid) -> Self {
        AuthPolicy::Or(vec![
            AuthPolicy::Owner(owner_id),
            AuthPolicy::HasRole(Role::Admin),
        ])
    }

    /// Check if the identity satisfies this policy
    pub fn check(&self, identity: &Identity) -> bool {
        match self {
            AuthPolicy::HasRole(required) => identity.role.satisfies(*required),
            AuthPolicy::Owner(owner_id) => identity.user_id == *owner_id,
            AuthPolicy::Or(policies) => policies.iter().any(|p| p.check(identity)),
        }
    }
}

/// Fail with `Forbidden` unless the identity's role satisfies `required`
pub fn authorize(identity: &Identity, required: Role) -> Result<(), ShopError> {
    if AuthPolicy::HasRole(required).check(identity) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = %identity.user_id,
            role = %identity.role,
            required = %required,
            "access denied"
        );
        Err(ShopError::Forbidden(format!("requires role {}", required)))
    }
}

/// Read the identity forwarded by the upstream auth layer
///
/// A missing or malformed user id is `Unauthorized`. A missing role header
/// means `Customer`; an unknown role is `Unauthorized`.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, ShopError> {
    let raw_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ShopError::Unauthorized(format!("missing {} header", USER_ID_HEADER)))?;
    let user_id = Uuid::parse_str(raw_id.trim())
        .map_err(|_| ShopError::Unauthorized(format!("malformed {} header", USER_ID_HEADER)))?;

    let role = match headers.get(USER_ROLE_HEADER) {
        None => Role::Customer,
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|raw| raw.parse::<Role>().ok())
            .ok_or_else(|| ShopError::Unauthorized(format!("malformed {} header", USER_ROLE_HEADER)))?,
    };

    Ok(Identity::new(user_id, role))
}
