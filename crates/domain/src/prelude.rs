//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use cpamm_domain::prelude::*;
//! ```

// Entities
pub use crate::entities::{Pool, PoolId, Reserve, Side, derive_shares_denom};

// Errors
pub use crate::error::DomainError;

// Math
pub use crate::math::{
    ExitQuote, JoinQuote, SwapQuote, calculate_k, calculate_spot_price, mul_div_ceil,
    mul_div_floor, quote_exit, quote_join, quote_swap,
};

// Value objects
pub use crate::value_objects::{Amount, AssetAmount, AttachedAssets, Denom};
