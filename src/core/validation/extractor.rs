//! Axum extractor for validated request bodies
//!
//! `Validated<T>` deserializes the JSON body and runs `T`'s derived
//! validation rules. Every failure is reported as a [`ShopError`] so the
//! response shape matches the rest of the API.

use super::validators::validate_payload;
use crate::core::error::ShopError;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that deserializes and validates a JSON payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn add_to_cart(
///     identity: Identity,
///     Validated(payload): Validated<AddToCartRequest>,
/// ) -> Result<Json<CartLine>, ShopError> {
///     // payload already passed its validation rules
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    /// Get the inner payload
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = ShopError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ShopError::invalid_input("body", rejection.body_text()))?;

        validate_payload(&payload)?;
        Ok(Validated(payload))
    }
}
