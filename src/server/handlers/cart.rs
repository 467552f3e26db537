//! Cart endpoints, always scoped to the caller

use crate::cart::model::{AddToCartRequest, CartLine, CartLineView};
use crate::core::auth::Identity;
use crate::core::error::ShopError;
use crate::core::validation::{Validated, parse_id};
use crate::server::extractors::IdPath;
use crate::server::handlers::{Deleted, HostState};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

pub async fn get_items(State(host): HostState, identity: Identity) -> Result<Json<Vec<CartLineView>>, ShopError> {
    Ok(Json(host.cart.get_items(&identity.user_id).await?))
}

pub async fn add_item(
    State(host): HostState,
    identity: Identity,
    Validated(payload): Validated<AddToCartRequest>,
) -> Result<(StatusCode, Json<CartLine>), ShopError> {
    let product_id = parse_id(&payload.product_id, "product_id")?;
    let line = host
        .cart
        .add_item(&identity.user_id, &product_id, payload.quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(line)))
}

pub async fn remove_item(
    State(host): HostState,
    identity: Identity,
    IdPath(line_id): IdPath,
) -> Result<Json<Deleted>, ShopError> {
    host.cart.remove_item(&identity.user_id, &line_id).await?;
    Ok(Json(Deleted::ok()))
}

pub async fn clear_cart(State(host): HostState, identity: Identity) -> Result<Json<Deleted>, ShopError> {
    let removed = host.cart.clear_cart(&identity.user_id).await?;
    Ok(Json(Deleted::count(removed)))
}
