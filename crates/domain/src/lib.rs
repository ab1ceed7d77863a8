//! Domain model for the constant-product market maker.
//!
//! This crate holds everything that does not touch a collaborator:
//! - Exact 256-bit integer arithmetic with explicit floor/ceil rounding
//! - Constant-product swap and liquidity share quoting
//! - Asset amounts, denominations and invocation attachments
//! - The pool record and its invariants

/// Prelude module for convenient imports.
pub mod prelude;

/// Pool entities.
pub mod entities;
/// Domain errors.
pub mod error;
/// Pool arithmetic.
pub mod math;
/// Asset value objects.
pub mod value_objects;

pub use error::DomainError;
