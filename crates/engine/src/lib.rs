//! Constant-product market maker engine.
//!
//! This crate implements the pool lifecycle on top of [`cpamm_domain`]:
//! - Pool creation with a fixed bootstrap share supply
//! - Proportional joins with excess refunds
//! - Share redemption with an external supply cross-check
//! - Single and multi-hop swaps with slippage protection
//!
//! The engine never owns storage or balances. Every side effect goes through
//! the collaborator traits in [`ports`], and one call runs exactly one
//! operation for one [`context::InvocationContext`]. Atomicity of those side
//! effects is the host's job.

/// Prelude module for convenient imports.
pub mod prelude;

/// Engine configuration.
pub mod config;
/// Per-invocation context.
pub mod context;
/// Engine entry point and queries.
pub mod engine;
/// Error taxonomy.
pub mod error;
/// Pool update notifications.
pub mod events;
/// Pool operations.
pub mod operations;
/// Collaborator interfaces.
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, EngineConfig};
pub use context::InvocationContext;
pub use engine::AmmEngine;
pub use error::{EngineError, ErrorKind};
pub use events::{PoolEvent, PoolEventKind};
pub use operations::{JoinResult, SwapRequest, SwapResult};
pub use ports::{AssetTransfer, EventSink, Host, HostError, PoolStore, SupplyQuery};
