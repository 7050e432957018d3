//! Request payload validation.
//!
//! DTOs implement [`Validate`] by running the rule helpers in [`rules`] against
//! each field and collecting every failure, so a rejected payload reports all of
//! its field errors at once.

mod error;
pub mod rules;

pub use error::{FieldError, FieldErrors, ValidationError};

/// Implemented by every request payload checked before it reaches the backend or the ledger.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}
