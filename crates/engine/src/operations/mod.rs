//! Pool operations.
//!
//! One invocation runs exactly one of these:
//! - [`AmmEngine::create_pool`](crate::AmmEngine::create_pool)
//! - [`AmmEngine::join_pool`](crate::AmmEngine::join_pool)
//! - [`AmmEngine::exit_pool`](crate::AmmEngine::exit_pool)
//! - [`AmmEngine::swap`](crate::AmmEngine::swap)
//!
//! [`AmmEngine::quote_route`](crate::AmmEngine::quote_route) prices a swap
//! route without an invocation.

mod create;
mod exit;
mod join;
mod swap;

pub use join::JoinResult;
pub use swap::{SwapRequest, SwapResult};
