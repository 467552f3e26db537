//! Orders: checkout and lifecycle
//!
//! An order is created exactly once, by checkout, and afterwards only its
//! status changes.

pub mod checkout;
pub mod guard;
pub mod lifecycle;
pub mod model;

pub use checkout::CheckoutService;
pub use guard::CheckoutGuard;
pub use lifecycle::OrderService;
pub use model::{Order, OrderItem, OrderStatus, OrderView};
