//! Per-invocation context.

use chrono::{DateTime, Utc};
use cpamm_domain::prelude::AttachedAssets;

/// Immutable facts about the invocation an operation runs in.
///
/// Passed explicitly into every engine call; the engine reads no ambient
/// globals for caller, time or attached assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    /// Address that sent the invocation.
    pub caller: String,
    /// Height of the block executing the invocation.
    pub block_height: u64,
    /// Time of the block executing the invocation.
    pub block_time: DateTime<Utc>,
    /// Assets delivered to the contract with this invocation.
    pub attached: AttachedAssets,
}

impl InvocationContext {
    /// Creates a context with nothing attached.
    #[must_use]
    pub fn new(caller: impl Into<String>, block_height: u64, block_time: DateTime<Utc>) -> Self {
        Self {
            caller: caller.into(),
            block_height,
            block_time,
            attached: AttachedAssets::new(),
        }
    }

    /// Sets the attached assets.
    #[must_use]
    pub fn with_attached(mut self, attached: AttachedAssets) -> Self {
        self.attached = attached;
        self
    }
}
