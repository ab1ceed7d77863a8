//! Pool update events.

use crate::context::InvocationContext;
use chrono::{DateTime, Utc};
use cpamm_domain::prelude::PoolId;
use serde::{Deserialize, Serialize};

/// Event key under which pool updates are published.
pub const POOL_UPDATE_EVENT: &str = "poolupdate";

/// Type of pool event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolEventKind {
    /// Pool was created.
    Created,
    /// Liquidity was added.
    Joined,
    /// Liquidity was removed.
    Exited,
    /// A swap hop went through the pool.
    Swapped,
}

/// Notification that a pool changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Event ID.
    pub id: String,
    /// Event type.
    pub kind: PoolEventKind,
    /// Affected pool.
    pub pool_id: PoolId,
    /// Invocation sender.
    pub caller: String,
    /// Block time.
    pub timestamp: DateTime<Utc>,
}

impl PoolEvent {
    /// Creates a new pool event for the current invocation.
    #[must_use]
    pub fn new(kind: PoolEventKind, pool_id: PoolId, ctx: &InvocationContext) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            pool_id,
            caller: ctx.caller.clone(),
            timestamp: ctx.block_time,
        }
    }

    /// Event key, shared by every kind.
    #[must_use]
    pub fn key(&self) -> &'static str {
        POOL_UPDATE_EVENT
    }
}
