//! Per-user shopping carts
//!
//! A cart is the set of lines a user owns. Adding a product already in the
//! cart increments its quantity instead of creating a second line.

pub mod model;
pub mod service;
pub mod store;

pub use model::{CartLine, CartLineView};
pub use service::CartService;
pub use store::CartStore;
