//! HTTP exposure of the shop services
//!
//! [`ShopHost`] wires the services, [`ServerBuilder`] turns a host into an
//! axum `Router` and serves it with graceful shutdown.

pub mod builder;
pub mod extractors;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use host::{ShopHost, Stores};
