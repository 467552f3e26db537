//! Core module containing the traits and types shared by every shop module

pub mod auth;
pub mod entity;
pub mod error;
pub mod retry;
pub mod service;
pub mod validation;

pub use auth::{AuthPolicy, Identity, Role, authorize};
pub use entity::Entity;
pub use error::{ErrorKind, ErrorResponse, FieldViolation, ShopError, ShopResult};
pub use retry::{RetryConfig, retry_with_backoff};
pub use service::DataService;
pub use validation::{Validated, parse_id, validate_payload};
