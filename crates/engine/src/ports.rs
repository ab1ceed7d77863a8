//! Collaborator interfaces.
//!
//! The engine talks to the outside world only through these traits. Calls are
//! synchronous. A host running the engine must commit every effect issued
//! during one operation together, or none of them if the operation fails.

use crate::events::PoolEvent;
use cpamm_domain::prelude::{Amount, AssetAmount, Denom, DomainError, Pool, PoolId};

/// Failures reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// An account does not hold enough of an asset.
    #[error("Insufficient funds: {address} holds {available}{denom}, needs {requested}{denom}")]
    InsufficientFunds {
        /// Account address.
        address: String,
        /// Asset denomination.
        denom: Denom,
        /// Current balance.
        available: Amount,
        /// Requested amount.
        requested: Amount,
    },
    /// A record was created under a key that already exists.
    #[error("Record already exists: {0}")]
    AlreadyExists(String),
    /// A record was updated under a key that does not exist.
    #[error("Record does not exist: {0}")]
    Missing(String),
    /// A stored record could not be encoded or decoded.
    #[error("Record codec failure: {0}")]
    Codec(String),
    /// A balance or supply left the representable range.
    #[error("Ledger arithmetic failure: {0}")]
    Ledger(#[from] DomainError),
}

/// Persistent pool storage.
pub trait PoolStore {
    /// Loads a pool. Unknown ids are `Ok(None)`.
    fn get(&self, pool_id: PoolId) -> Result<Option<Pool>, HostError>;

    /// Stores a new pool. Fails if the id is already taken.
    fn create(&mut self, pool: &Pool) -> Result<(), HostError>;

    /// Replaces an existing pool.
    fn update(&mut self, pool: &Pool) -> Result<(), HostError>;

    /// Issues a pool id never returned before.
    fn allocate_next_id(&mut self) -> Result<PoolId, HostError>;
}

/// Token supply lookups.
pub trait SupplyQuery {
    /// Total outstanding supply of a denomination.
    fn total_supply(&self, denom: &Denom) -> Result<Amount, HostError>;
}

/// Asset movements. Minted assets land in the contract's own custody and
/// burned assets leave it.
pub trait AssetTransfer {
    /// Mints new units into the contract.
    fn mint(&mut self, asset: &AssetAmount) -> Result<(), HostError>;

    /// Burns units held by the contract.
    fn burn(&mut self, asset: &AssetAmount) -> Result<(), HostError>;

    /// Moves assets between two accounts.
    fn transfer(&mut self, from: &str, to: &str, assets: &[AssetAmount])
    -> Result<(), HostError>;
}

/// Best-effort pool update notifications.
pub trait EventSink {
    /// Records that a pool changed.
    fn notify(&mut self, event: PoolEvent);
}

/// Everything the engine needs from its host.
pub trait Host: PoolStore + SupplyQuery + AssetTransfer + EventSink {}

impl<T> Host for T where T: PoolStore + SupplyQuery + AssetTransfer + EventSink {}
