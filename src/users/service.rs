//! Admin operations on user profiles

use crate::core::Entity;
use crate::core::auth::{Identity, Role, authorize};
use crate::core::error::{ShopError, ShopResult};
use crate::core::service::DataService;
use crate::core::validation::{trim, validate_payload};
use crate::users::model::{UpdateUserRequest, UserProfile, normalize_email};
use std::sync::Arc;
use uuid::Uuid;

/// Every operation requires the `ADMIN` role
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn DataService<UserProfile>>,
}

impl UserService {
    pub fn new(users: Arc<dyn DataService<UserProfile>>) -> Self {
        Self { users }
    }

    async fn find(&self, id: &Uuid) -> ShopResult<UserProfile> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| ShopError::not_found(UserProfile::resource_name_singular(), id))
    }

    async fn ensure_unique_email(&self, email: &str, except: Uuid) -> ShopResult<()> {
        let taken = self
            .users
            .search("email", email)
            .await?
            .into_iter()
            .any(|existing| existing.id != except);

        if taken {
            return Err(ShopError::Conflict {
                entity: UserProfile::resource_name_singular(),
                field: "email",
                value: email.to_string(),
            });
        }
        Ok(())
    }

    /// All profiles, newest first
    pub async fn list_users(&self, identity: &Identity) -> ShopResult<Vec<UserProfile>> {
        authorize(identity, Role::Admin)?;
        Ok(self.users.list().await?)
    }

    pub async fn get_user(&self, identity: &Identity, id: &Uuid) -> ShopResult<UserProfile> {
        authorize(identity, Role::Admin)?;
        self.find(id).await
    }

    /// Apply a partial update. A new email must not belong to another user
    pub async fn update_user(
        &self,
        identity: &Identity,
        id: &Uuid,
        request: UpdateUserRequest,
    ) -> ShopResult<UserProfile> {
        authorize(identity, Role::Admin)?;
        validate_payload(&request)?;

        let mut profile = self.find(id).await?;

        if let Some(name) = request.name {
            profile.name = trim(&name);
        }
        if let Some(email) = request.email {
            let email = normalize_email(&email);
            self.ensure_unique_email(&email, profile.id).await?;
            profile.email = email;
        }
        if let Some(role) = request.role {
            profile.role = role;
        }
        profile.touch();

        let profile = self
            .users
            .update(id, profile)
            .await?
            .ok_or_else(|| ShopError::not_found(UserProfile::resource_name_singular(), id))?;

        tracing::info!(user_id = %profile.id, role = %profile.role, admin_id = %identity.user_id, "User updated");
        Ok(profile)
    }

    /// Delete a profile. Orders placed by the user are kept
    pub async fn delete_user(&self, identity: &Identity, id: &Uuid) -> ShopResult<()> {
        authorize(identity, Role::Admin)?;

        if !self.users.delete(id).await? {
            return Err(ShopError::not_found(UserProfile::resource_name_singular(), id));
        }

        tracing::info!(user_id = %id, admin_id = %identity.user_id, "User deleted");
        Ok(())
    }
}
