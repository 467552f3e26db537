//! Checkout and order endpoints

use crate::core::auth::Identity;
use crate::core::error::ShopError;
use crate::core::validation::Validated;
use crate::orders::model::{CheckoutRequest, OrderView, UpdateOrderStatusRequest};
use crate::server::extractors::IdPath;
use crate::server::handlers::HostState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;

/// Checkout accepts an empty body as well as `{"shipping_address": ...}`
pub async fn checkout(
    State(host): HostState,
    identity: Identity,
    body: Bytes,
) -> Result<(StatusCode, Json<OrderView>), ShopError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CheckoutRequest::default()
    } else {
        serde_json::from_slice::<CheckoutRequest>(&body)
            .map_err(|e| ShopError::invalid_input("body", e.to_string()))?
    };

    let order = host
        .checkout
        .checkout(&identity, request.shipping_address)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn my_orders(State(host): HostState, identity: Identity) -> Result<Json<Vec<OrderView>>, ShopError> {
    Ok(Json(host.orders.find_for_user(&identity.user_id).await?))
}

pub async fn list_orders(State(host): HostState, identity: Identity) -> Result<Json<Vec<OrderView>>, ShopError> {
    Ok(Json(host.orders.find_all(&identity).await?))
}

pub async fn get_order(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
) -> Result<Json<OrderView>, ShopError> {
    Ok(Json(host.orders.find_one(&identity, &id).await?))
}

pub async fn update_status(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
    Validated(payload): Validated<UpdateOrderStatusRequest>,
) -> Result<Json<OrderView>, ShopError> {
    Ok(Json(
        host.orders
            .update_status(&identity, &id, payload.status)
            .await?,
    ))
}
