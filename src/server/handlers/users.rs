//! Admin user endpoints

use crate::core::auth::Identity;
use crate::core::error::ShopError;
use crate::core::validation::Validated;
use crate::server::extractors::IdPath;
use crate::server::handlers::{Deleted, HostState};
use crate::users::{UpdateUserRequest, UserProfile};
use axum::Json;
use axum::extract::State;

pub async fn list_users(State(host): HostState, identity: Identity) -> Result<Json<Vec<UserProfile>>, ShopError> {
    Ok(Json(host.users.list_users(&identity).await?))
}

pub async fn get_user(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
) -> Result<Json<UserProfile>, ShopError> {
    Ok(Json(host.users.get_user(&identity, &id).await?))
}

pub async fn update_user(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
    Validated(payload): Validated<UpdateUserRequest>,
) -> Result<Json<UserProfile>, ShopError> {
    Ok(Json(host.users.update_user(&identity, &id, payload).await?))
}

pub async fn delete_user(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
) -> Result<Json<Deleted>, ShopError> {
    host.users.delete_user(&identity, &id).await?;
    Ok(Json(Deleted::ok()))
}
