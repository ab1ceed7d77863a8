//! In-crate test host.

use crate::config::{DEFAULT_ANCHOR_DENOM, DEFAULT_CONTRACT_ADDRESS, EngineConfig};
use crate::context::InvocationContext;
use crate::engine::AmmEngine;
use crate::events::PoolEvent;
use crate::ports::{AssetTransfer, EventSink, HostError, PoolStore, SupplyQuery};
use chrono::{TimeZone, Utc};
use cpamm_domain::math::rounding::{add, sub};
use cpamm_domain::prelude::{Amount, AssetAmount, AttachedAssets, Denom, Pool, PoolId};
use std::collections::BTreeMap;

pub(crate) const CALLER: &str = "cpamm1caller";

pub(crate) fn test_engine() -> AmmEngine {
    AmmEngine::new(EngineConfig::new(
        DEFAULT_CONTRACT_ADDRESS,
        Denom::new(DEFAULT_ANCHOR_DENOM).unwrap(),
    ))
}

pub(crate) fn amt(v: u64) -> Amount {
    Amount::from(v)
}

#[derive(Debug, Default)]
pub(crate) struct MockHost {
    pub pools: BTreeMap<PoolId, Pool>,
    pub last_id: u64,
    pub balances: BTreeMap<(String, Denom), Amount>,
    pub supply: BTreeMap<Denom, Amount>,
    pub events: Vec<PoolEvent>,
    pub contract: String,
    pub updates: usize,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            contract: DEFAULT_CONTRACT_ADDRESS.to_string(),
            ..Self::default()
        }
    }

    pub fn balance(&self, address: &str, denom: &str) -> Amount {
        self.balances
            .get(&(address.to_string(), Denom::new(denom).unwrap()))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn credit(&mut self, address: &str, asset: &AssetAmount) {
        let entry = self
            .balances
            .entry((address.to_string(), asset.denom.clone()))
            .or_insert(Amount::ZERO);
        *entry = add(*entry, asset.amount).unwrap();
    }

    fn debit(&mut self, address: &str, asset: &AssetAmount) -> Result<(), HostError> {
        let key = (address.to_string(), asset.denom.clone());
        let available = self.balances.get(&key).copied().unwrap_or(Amount::ZERO);
        if available < asset.amount {
            return Err(HostError::InsufficientFunds {
                address: address.to_string(),
                denom: asset.denom.clone(),
                available,
                requested: asset.amount,
            });
        }
        self.balances.insert(key, sub(available, asset.amount)?);
        Ok(())
    }

    /// Delivers `coins` into the contract and returns the invocation context.
    pub fn invoke(&mut self, caller: &str, coins: &[&str]) -> InvocationContext {
        let coins: Vec<AssetAmount> = coins.iter().map(|c| c.parse().unwrap()).collect();
        let contract = self.contract.clone();
        for coin in &coins {
            self.credit(&contract, coin);
        }
        InvocationContext::new(
            caller,
            100,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
        .with_attached(AttachedAssets::from_assets(coins).unwrap())
    }
}

impl PoolStore for MockHost {
    fn get(&self, pool_id: PoolId) -> Result<Option<Pool>, HostError> {
        Ok(self.pools.get(&pool_id).cloned())
    }

    fn create(&mut self, pool: &Pool) -> Result<(), HostError> {
        if self.pools.contains_key(&pool.pool_id) {
            return Err(HostError::AlreadyExists(pool.pool_id.to_string()));
        }
        self.pools.insert(pool.pool_id, pool.clone());
        Ok(())
    }

    fn update(&mut self, pool: &Pool) -> Result<(), HostError> {
        if !self.pools.contains_key(&pool.pool_id) {
            return Err(HostError::Missing(pool.pool_id.to_string()));
        }
        self.updates += 1;
        self.pools.insert(pool.pool_id, pool.clone());
        Ok(())
    }

    fn allocate_next_id(&mut self) -> Result<PoolId, HostError> {
        self.last_id += 1;
        Ok(PoolId(self.last_id))
    }
}

impl SupplyQuery for MockHost {
    fn total_supply(&self, denom: &Denom) -> Result<Amount, HostError> {
        Ok(self.supply.get(denom).copied().unwrap_or(Amount::ZERO))
    }
}

impl AssetTransfer for MockHost {
    fn mint(&mut self, asset: &AssetAmount) -> Result<(), HostError> {
        let contract = self.contract.clone();
        self.credit(&contract, asset);
        let supply = self.supply.entry(asset.denom.clone()).or_insert(Amount::ZERO);
        *supply = add(*supply, asset.amount)?;
        Ok(())
    }

    fn burn(&mut self, asset: &AssetAmount) -> Result<(), HostError> {
        let contract = self.contract.clone();
        self.debit(&contract, asset)?;
        let supply = self.supply.entry(asset.denom.clone()).or_insert(Amount::ZERO);
        *supply = sub(*supply, asset.amount)?;
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
            self.credit(to, asset);
        }
        Ok(())
    }
}

impl EventSink for MockHost {
    fn notify(&mut self, event: PoolEvent) {
        self.events.push(event);
    }
}

/// Creates a pool from `coins` and returns it.
pub(crate) fn seed_pool(engine: &AmmEngine, host: &mut MockHost, coins: &[&str]) -> Pool {
    let ctx = host.invoke(CALLER, coins);
    engine.create_pool(host, &ctx).unwrap()
}
