//! User directory administration
//!
//! Accounts are registered and authenticated by an external service that
//! writes to the `users` collection. The shop reads profiles to decorate
//! admin order listings and lets admins list, inspect, edit and remove
//! them.

pub mod model;
pub mod service;

pub use model::{UpdateUserRequest, UserProfile, UserSummary};
pub use service::UserService;
