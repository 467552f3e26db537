//! Validation and filtering of incoming payloads
//!
//! Request DTOs derive [`validator::Validate`] and reference the custom
//! validators in [`validators`]. Filters normalize free text before it is
//! stored, and the [`Validated`] extractor runs both at the HTTP edge.

pub mod extractor;
pub mod filters;
pub mod validators;

pub use extractor::Validated;
pub use filters::{trim, trim_optional};
pub use validators::{non_negative, not_blank, parse_id, validate_payload};
