//! Prelude module for convenient imports.
//!
//! Re-exports the engine, its ports and the domain types callers need to
//! drive it.
//!
//! # Example
//!
//! ```rust
//! use cpamm_engine::prelude::*;
//! ```

// Engine
pub use crate::config::{ConfigError, EngineConfig};
pub use crate::context::InvocationContext;
pub use crate::engine::AmmEngine;
pub use crate::operations::{JoinResult, SwapRequest, SwapResult};

// Errors
pub use crate::error::{EngineError, ErrorKind};

// Events
pub use crate::events::{POOL_UPDATE_EVENT, PoolEvent, PoolEventKind};

// Ports
pub use crate::ports::{AssetTransfer, EventSink, Host, HostError, PoolStore, SupplyQuery};

// Domain
pub use cpamm_domain::prelude::*;
