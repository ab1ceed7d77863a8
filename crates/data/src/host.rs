//! In-memory reference host.
//!
//! [`MemoryHost`] keeps pool records, account balances, token supply and the
//! event log in one serializable [`LedgerState`]. Each engine operation runs
//! inside [`MemoryHost::invoke`], which commits the operation's effects only
//! if it succeeds.

use crate::record::{NEXT_POOL_ID_KEY, POOL_KEY_PREFIX, PoolRecord, decode_next_id, pool_key};
use chrono::{DateTime, Utc};
use cpamm_domain::math::rounding::{add, sub};
use cpamm_domain::prelude::{Amount, AssetAmount, AttachedAssets, Denom, Pool, PoolId};
use cpamm_engine::prelude::{
    AssetTransfer, EngineError, EventSink, HostError, InvocationContext, PoolEvent, PoolStore,
    SupplyQuery,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Everything the host persists between invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Key-value records, including pools and the id counter.
    pub storage: BTreeMap<String, String>,
    /// Balances by account, then denomination.
    pub balances: BTreeMap<String, BTreeMap<Denom, Amount>>,
    /// Outstanding supply by denomination.
    pub supply: BTreeMap<Denom, Amount>,
    /// Pool events, oldest first.
    pub events: Vec<PoolEvent>,
    /// Height of the last committed invocation.
    pub block_height: u64,
}

/// Reference implementation of every engine collaborator.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    contract: String,
    state: LedgerState,
}

impl MemoryHost {
    /// Creates an empty host for the contract at `contract`.
    #[must_use]
    pub fn new(contract: impl Into<String>) -> Self {
        Self::with_state(contract, LedgerState::default())
    }

    /// Creates a host over previously saved state.
    #[must_use]
    pub fn with_state(contract: impl Into<String>, state: LedgerState) -> Self {
        Self {
            contract: contract.into(),
            state,
        }
    }

    /// Contract address.
    #[must_use]
    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Balance of `denom` held by `address`.
    #[must_use]
    pub fn balance(&self, address: &str, denom: &Denom) -> Amount {
        self.state
            .balances
            .get(address)
            .and_then(|held| held.get(denom))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Every non-zero balance held by `address`.
    #[must_use]
    pub fn balances(&self, address: &str) -> Vec<AssetAmount> {
        self.state
            .balances
            .get(address)
            .map(|held| {
                held.iter()
                    .filter(|(_, amount)| !amount.is_zero())
                    .map(|(denom, amount)| AssetAmount {
                        denom: denom.clone(),
                        amount: *amount,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every stored pool in id order.
    ///
    /// # Errors
    /// Returns [`HostError::Codec`] if a stored record is corrupt.
    pub fn pools(&self) -> Result<Vec<Pool>, HostError> {
        self.state
            .storage
            .range(POOL_KEY_PREFIX.to_string()..)
            .take_while(|(key, _)| key.starts_with(POOL_KEY_PREFIX))
            .map(|(key, value)| {
                PoolRecord {
                    key: key.clone(),
                    value: value.clone(),
                }
                .to_pool()
            })
            .collect()
    }

    /// Mints `asset` straight into `address`, outside of any invocation.
    ///
    /// # Errors
    /// Returns [`HostError::Ledger`] if the balance or supply would overflow.
    pub fn fund(&mut self, address: &str, asset: &AssetAmount) -> Result<(), HostError> {
        self.credit(address, asset)?;
        self.grow_supply(asset)?;
        debug!(address = %address, asset = %asset, "Account funded");
        Ok(())
    }

    /// Runs one engine operation as one invocation.
    ///
    /// `coins` are moved from `caller` into the contract and handed to `op`
    /// through the context. If delivery or `op` fails, every effect of the
    /// invocation is discarded, including pool writes from earlier swap hops.
    ///
    /// # Errors
    /// Returns the delivery or operation error.
    pub fn invoke<T, F>(
        &mut self,
        caller: &str,
        coins: &[AssetAmount],
        block_time: DateTime<Utc>,
        op: F,
    ) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Self, &InvocationContext) -> Result<T, EngineError>,
    {
        let snapshot = self.state.clone();
        let height = snapshot.block_height + 1;

        let outcome = self.deliver(caller, coins).and_then(|attached| {
            let ctx = InvocationContext::new(caller, height, block_time).with_attached(attached);
            op(self, &ctx)
        });

        match outcome {
            Ok(value) => {
                self.state.block_height = height;
                Ok(value)
            }
            Err(err) => {
                warn!(
                    caller = %caller,
                    block_height = height,
                    kind = ?err.kind(),
                    error = %err,
                    "Invocation rolled back"
                );
                self.state = snapshot;
                Err(err)
            }
        }
    }

    fn deliver(
        &mut self,
        caller: &str,
        coins: &[AssetAmount],
    ) -> Result<AttachedAssets, EngineError> {
        let attached = AttachedAssets::from_assets(coins.iter().cloned())?;
        let contract = self.contract.clone();
        self.transfer(caller, &contract, coins)?;
        Ok(attached)
    }

    fn credit(&mut self, address: &str, asset: &AssetAmount) -> Result<(), HostError> {
        let held = self
            .state
            .balances
            .entry(address.to_string())
            .or_default()
            .entry(asset.denom.clone())
            .or_insert(Amount::ZERO);
        *held = add(*held, asset.amount)?;
        Ok(())
    }

    fn debit(&mut self, address: &str, asset: &AssetAmount) -> Result<(), HostError> {
        let available = self.balance(address, &asset.denom);
        if available < asset.amount {
            return Err(HostError::InsufficientFunds {
                address: address.to_string(),
                denom: asset.denom.clone(),
                available,
                requested: asset.amount,
            });
        }
        self.state
            .balances
            .entry(address.to_string())
            .or_default()
            .insert(asset.denom.clone(), sub(available, asset.amount)?);
        Ok(())
    }

    fn grow_supply(&mut self, asset: &AssetAmount) -> Result<(), HostError> {
        let supply = self
            .state
            .supply
            .entry(asset.denom.clone())
            .or_insert(Amount::ZERO);
        *supply = add(*supply, asset.amount)?;
        Ok(())
    }

    fn shrink_supply(&mut self, asset: &AssetAmount) -> Result<(), HostError> {
        let supply = self
            .state
            .supply
            .entry(asset.denom.clone())
            .or_insert(Amount::ZERO);
        *supply = sub(*supply, asset.amount)?;
        Ok(())
    }
}

impl PoolStore for MemoryHost {
    fn get(&self, pool_id: PoolId) -> Result<Option<Pool>, HostError> {
        let key = pool_key(pool_id);
        self.state
            .storage
            .get(&key)
            .map(|value| {
                PoolRecord {
                    key,
                    value: value.clone(),
                }
                .to_pool()
            })
            .transpose()
    }

    fn create(&mut self, pool: &Pool) -> Result<(), HostError> {
        let record = PoolRecord::from_pool(pool)?;
        if self.state.storage.contains_key(&record.key) {
            return Err(HostError::AlreadyExists(record.key));
        }
        debug!(key = %record.key, "Pool record stored");
        self.state.storage.insert(record.key, record.value);
        Ok(())
    }

    fn update(&mut self, pool: &Pool) -> Result<(), HostError> {
        let record = PoolRecord::from_pool(pool)?;
        if !self.state.storage.contains_key(&record.key) {
            return Err(HostError::Missing(record.key));
        }
        debug!(key = %record.key, "Pool record updated");
        self.state.storage.insert(record.key, record.value);
        Ok(())
    }

    fn allocate_next_id(&mut self) -> Result<PoolId, HostError> {
        let next = decode_next_id(self.state.storage.get(NEXT_POOL_ID_KEY).map(String::as_str))?;
        let after = next
            .checked_add(1)
            .ok_or_else(|| HostError::Codec(format!("{NEXT_POOL_ID_KEY}: exhausted")))?;
        self.state
            .storage
            .insert(NEXT_POOL_ID_KEY.to_string(), after.to_string());
        Ok(PoolId(next))
    }
}

impl SupplyQuery for MemoryHost {
    fn total_supply(&self, denom: &Denom) -> Result<Amount, HostError> {
        Ok(self
            .state
            .supply
            .get(denom)
            .copied()
            .unwrap_or(Amount::ZERO))
    }
}

impl AssetTransfer for MemoryHost {
    fn mint(&mut self, asset: &AssetAmount) -> Result<(), HostError> {
        let contract = self.contract.clone();
        self.credit(&contract, asset)?;
        self.grow_supply(asset)?;
        debug!(asset = %asset, "Minted");
        Ok(())
    }

    fn burn(&mut self, asset: &AssetAmount) -> Result<(), HostError> {
        let contract = self.contract.clone();
        self.debit(&contract, asset)?;
        self.shrink_supply(asset)?;
        debug!(asset = %asset, "Burned");
        Ok(())
    }

    fn transfer(
        &mut self,
        from: &str,
        to: &str,
        assets: &[AssetAmount],
    ) -> Result<(), HostError> {
        for asset in assets {
            self.debit(from, asset)?;
            self.credit(to, asset)?;
        }
        debug!(from = %from, to = %to, count = assets.len(), "Transferred");
        Ok(())
    }
}

impl EventSink for MemoryHost {
    fn notify(&mut self, event: PoolEvent) {
        debug!(key = event.key(), pool_id = %event.pool_id, kind = ?event.kind, "Pool event");
        self.state.events.push(event);
    }
}
