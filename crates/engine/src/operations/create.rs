use crate::context::InvocationContext;
use crate::engine::AmmEngine;
use crate::error::EngineError;
use crate::events::{PoolEvent, PoolEventKind};
use crate::ports::Host;
use cpamm_domain::prelude::{AssetAmount, Pool, Reserve};
use tracing::{debug, info};

impl AmmEngine {
    /// Creates a pool from exactly two attached assets, one of them the
    /// anchor asset.
    ///
    /// Both attachments become the initial reserves. The bootstrap share
    /// supply is minted to the contract and handed to the caller.
    ///
    /// # Errors
    /// - [`EngineError::AttachmentCount`] unless two denominations are attached
    /// - [`EngineError::MissingAnchor`] if neither is the anchor asset
    pub fn create_pool<H>(&self, host: &mut H, ctx: &InvocationContext) -> Result<Pool, EngineError>
    where
        H: Host + ?Sized,
    {
        let coins = self.attachments(ctx, 2)?;
        let anchor = &self.config().anchor_denom;

        // The anchor asset is always the quote side.
        let (base_coin, quote_coin) = if coins[0].denom == *anchor {
            (&coins[1], &coins[0])
        } else if coins[1].denom == *anchor {
            (&coins[0], &coins[1])
        } else {
            return Err(EngineError::MissingAnchor {
                anchor: anchor.clone(),
            });
        };

        let pool_id = host.allocate_next_id()?;
        let shares_denom = self.shares_denom(pool_id)?;
        let pool = Pool {
            pool_id,
            base: Reserve::new(base_coin.denom.clone(), base_coin.amount),
            quote: Reserve::new(quote_coin.denom.clone(), quote_coin.amount),
            total_shares: self.config().bootstrap_shares,
            shares_denom: shares_denom.clone(),
            created: ctx.block_time,
            updated: None,
            block_height: ctx.block_height,
            num_trades: None,
        };
        pool.validate()?;
        host.create(&pool)?;
        debug!(pool_id = %pool_id, "Pool record created");

        let shares = AssetAmount {
            denom: shares_denom,
            amount: pool.total_shares,
        };
        host.mint(&shares)?;
        self.pay_out(host, &ctx.caller, std::slice::from_ref(&shares))?;
        host.notify(PoolEvent::new(PoolEventKind::Created, pool_id, ctx));

        info!(
            pool_id = %pool_id,
            base = %base_coin,
            quote = %quote_coin,
            shares = %shares,
            caller = %ctx.caller,
            "Pool created"
        );

        Ok(pool)
    }
}
