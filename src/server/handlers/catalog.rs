//! Category and product endpoints

use crate::catalog::model::{
    Category, CreateCategoryRequest, CreateProductRequest, Product, ProductView, UpdateCategoryRequest,
    UpdateProductRequest,
};
use crate::core::auth::Identity;
use crate::core::error::ShopError;
use crate::core::validation::Validated;
use crate::server::extractors::IdPath;
use crate::server::handlers::{Deleted, HostState};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

pub async fn list_categories(State(host): HostState) -> Result<Json<Vec<Category>>, ShopError> {
    Ok(Json(host.catalog.list_categories().await?))
}

pub async fn get_category(State(host): HostState, IdPath(id): IdPath) -> Result<Json<Category>, ShopError> {
    Ok(Json(host.catalog.get_category(&id).await?))
}

pub async fn create_category(
    State(host): HostState,
    identity: Identity,
    Validated(payload): Validated<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ShopError> {
    let category = host.catalog.create_category(&identity, payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
    Validated(payload): Validated<UpdateCategoryRequest>,
) -> Result<Json<Category>, ShopError> {
    Ok(Json(host.catalog.update_category(&identity, &id, payload).await?))
}

pub async fn delete_category(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
) -> Result<Json<Deleted>, ShopError> {
    host.catalog.delete_category(&identity, &id).await?;
    Ok(Json(Deleted::ok()))
}

pub async fn list_products(State(host): HostState) -> Result<Json<Vec<ProductView>>, ShopError> {
    Ok(Json(host.catalog.list_products().await?))
}

pub async fn get_product(State(host): HostState, IdPath(id): IdPath) -> Result<Json<ProductView>, ShopError> {
    Ok(Json(host.catalog.get_product(&id).await?))
}

pub async fn create_product(
    State(host): HostState,
    identity: Identity,
    Validated(payload): Validated<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ShopError> {
    let product = host.catalog.create_product(&identity, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
    Validated(payload): Validated<UpdateProductRequest>,
) -> Result<Json<Product>, ShopError> {
    Ok(Json(host.catalog.update_product(&identity, &id, payload).await?))
}

pub async fn delete_product(
    State(host): HostState,
    identity: Identity,
    IdPath(id): IdPath,
) -> Result<Json<Deleted>, ShopError> {
    host.catalog.delete_product(&identity, &id).await?;
    Ok(Json(Deleted::ok()))
}
