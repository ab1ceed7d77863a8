use crate::config::EngineConfig;
use crate::context::InvocationContext;
use crate::error::EngineError;
use crate::ports::{Host, PoolStore};
use cpamm_domain::prelude::{AssetAmount, Denom, Pool, PoolId};

/// The market maker. Stateless apart from its configuration; every operation
/// works on a transient copy of the pools it touches.
#[derive(Debug, Clone)]
pub struct AmmEngine {
    config: EngineConfig,
}

impl AmmEngine {
    /// Creates an engine.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Share token denomination for a pool.
    ///
    /// # Errors
    /// Returns an error if the configured prefix and address do not form a
    /// legal denomination.
    pub fn shares_denom(&self, pool_id: PoolId) -> Result<Denom, EngineError> {
        Ok(self.config.shares_denom(pool_id)?)
    }

    /// Loads a pool.
    ///
    /// # Errors
    /// Returns [`EngineError::PoolNotFound`] for unknown ids.
    pub fn pool<S>(&self, store: &S, pool_id: PoolId) -> Result<Pool, EngineError>
    where
        S: PoolStore + ?Sized,
    {
        store
            .get(pool_id)?
            .ok_or(EngineError::PoolNotFound(pool_id))
    }

    /// Attached assets, checked for count and positivity, in denomination order.
    pub(crate) fn attachments(
        &self,
        ctx: &InvocationContext,
        expected: usize,
    ) -> Result<Vec<AssetAmount>, EngineError> {
        if ctx.attached.len() != expected {
            return Err(EngineError::AttachmentCount {
                expected,
                got: ctx.attached.len(),
            });
        }
        let coins = ctx.attached.to_vec();
        if let Some(zero) = coins.iter().find(|coin| coin.is_zero()) {
            return Err(EngineError::NonPositiveAttachment {
                denom: zero.denom.clone(),
            });
        }
        Ok(coins)
    }

    /// Checks invariants and writes the pool back. The stored record must
    /// carry the same id, share denomination and reserve assets.
    pub(crate) fn commit<H>(&self, host: &mut H, pool: &Pool) -> Result<(), EngineError>
    where
        H: Host + ?Sized,
    {
        pool.validate()?;
        let stored = self.pool(host, pool.pool_id)?;
        if !stored.same_identity(pool) {
            return Err(EngineError::PoolIdentityChanged {
                pool_id: pool.pool_id,
                stored: stored.shares_denom,
                updated: pool.shares_denom.clone(),
            });
        }
        host.update(pool)?;
        Ok(())
    }

    /// Sends assets from the contract's custody to `to`.
    pub(crate) fn pay_out<H>(
        &self,
        host: &mut H,
        to: &str,
        assets: &[AssetAmount],
    ) -> Result<(), EngineError>
    where
        H: Host + ?Sized,
    {
        if assets.is_empty() {
            return Ok(());
        }
        host.transfer(&self.config.contract_address, to, assets)?;
        Ok(())
    }
}
