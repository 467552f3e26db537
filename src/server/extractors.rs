//! Request extractors shared by the handlers

use crate::core::auth::{Identity, identity_from_headers};
use crate::core::error::ShopError;
use crate::core::validation::parse_id;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ShopError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_headers(&parts.headers)
    }
}

/// A `{id}` path segment parsed as a UUID
///
/// Malformed ids are rejected with `InvalidInput` instead of axum's plain
/// text rejection.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ShopError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ShopError::invalid_input("id", rejection.body_text()))?;
        Ok(IdPath(parse_id(&raw, "id")?))
    }
}
