//! Route table for the shop API

use crate::server::handlers::{cart, catalog, health_check, orders, users};
use crate::server::host::ShopHost;
use axum::Router;
use axum::routing::{get, patch, post};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the shop routes
///
/// - GET /health
/// - GET, POST /categories; GET, PATCH, DELETE /categories/{id}
/// - GET, POST /products; GET, PATCH, DELETE /products/{id}
/// - GET, POST, DELETE /cart; DELETE /cart/{id}
/// - POST /orders/checkout; GET /orders/me; GET /orders
/// - GET /orders/{id}; PATCH /orders/{id}/status
/// - GET /users; GET, PATCH, DELETE /users/{id}
pub fn build_shop_routes(host: Arc<ShopHost>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .route(
            "/categories/{id}",
            get(catalog::get_category)
                .patch(catalog::update_category)
                .delete(catalog::delete_category),
        )
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/products/{id}",
            get(catalog::get_product)
                .patch(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route(
            "/cart",
            get(cart::get_items)
                .post(cart::add_item)
                .delete(cart::clear_cart),
        )
        .route("/cart/{id}", axum::routing::delete(cart::remove_item))
        .route("/orders", get(orders::list_orders))
        .route("/orders/checkout", post(orders::checkout))
        .route("/orders/me", get(orders::my_orders))
        .route("/orders/{id}", get(orders::get_order))
        .route("/orders/{id}/status", patch(orders::update_status))
        .route("/users", get(users::list_users))
        .route(
            "/users/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .with_state(host)
}

/// Wrap a router with request tracing and permissive CORS
pub fn with_http_layers(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}
