//! HTTP handlers
//!
//! Handlers only translate between HTTP and the services on [`ShopHost`];
//! every rule lives in the services.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod users;

use crate::server::host::ShopHost;
use axum::Json;
use axum::extract::State;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Handler state: the shared host
pub type HostState = State<Arc<ShopHost>>;

/// Body returned by delete endpoints
#[derive(Debug, Clone, Serialize)]
pub struct Deleted {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<u64>,
}

impl Deleted {
    pub fn ok() -> Self {
        Self {
            success: true,
            removed: None,
        }
    }

    pub fn count(removed: u64) -> Self {
        Self {
            success: true,
            removed: Some(removed),
        }
    }
}

/// Health check endpoint handler
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME")
    }))
}
