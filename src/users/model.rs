//! User documents and request payloads

use crate::core::auth::Role;
use crate::core::validation::not_blank;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

crate::define_entity!(
    UserProfile, "users", "user",
    {
        name: String,
        /// Stored trimmed and lowercased
        email: String,
        role: Role,
    }
);

/// The public subset of a profile embedded in order views
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserProfile> for UserSummary {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            role: profile.role,
        }
    }
}

/// Partial profile update; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub name: Option<String>,
    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Canonical form under which emails are stored and compared
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}
