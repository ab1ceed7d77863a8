use crate::context::InvocationContext;
use crate::engine::AmmEngine;
use crate::error::EngineError;
use crate::events::{PoolEvent, PoolEventKind};
use crate::ports::Host;
use cpamm_domain::math::rounding::add;
use cpamm_domain::prelude::{Amount, AssetAmount, Denom, PoolId, quote_join};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinResult {
    /// Joined pool.
    pub pool_id: PoolId,
    /// Shares minted to the caller.
    pub shares: Amount,
    /// Share token denomination.
    pub share_denom: Denom,
    /// Over-supplied amounts returned to the caller.
    pub refund: Vec<AssetAmount>,
}

impl AmmEngine {
    /// Adds liquidity to a pool from two attached assets matching its reserves.
    ///
    /// Whichever side exceeds the current ratio has the excess refunded. The
    /// reserves still absorb the full attached amounts. Minted shares are the
    /// smaller of the per-side share counts, computed on pre-deposit reserves.
    ///
    /// # Errors
    /// - [`EngineError::AttachmentCount`] unless two denominations are attached
    /// - [`EngineError::PoolNotFound`] for unknown pools
    /// - [`EngineError::UnexpectedDenom`] if an attachment is not a pool reserve
    /// - [`EngineError::JoinTooSmall`] if no shares would be minted
    pub fn join_pool<H>(
        &self,
        host: &mut H,
        ctx: &InvocationContext,
        pool_id: PoolId,
    ) -> Result<JoinResult, EngineError>
    where
        H: Host + ?Sized,
    {
        let coins = self.attachments(ctx, 2)?;
        let mut pool = self.pool(host, pool_id)?;

        if let Some(stray) = coins.iter().find(|coin| pool.side_of(&coin.denom).is_none()) {
            return Err(EngineError::UnexpectedDenom {
                pool_id,
                denom: stray.denom.clone(),
                base: pool.base.denom.clone(),
                quote: pool.quote.denom.clone(),
            });
        }
        // Both attachments are pool reserves and distinct, so both lookups hit.
        let sent_base = ctx.attached.get(&pool.base.denom).unwrap_or(Amount::ZERO);
        let sent_quote = ctx.attached.get(&pool.quote.denom).unwrap_or(Amount::ZERO);

        let quote = quote_join(
            sent_base,
            sent_quote,
            pool.base.balance,
            pool.quote.balance,
            pool.total_shares,
        )?;
        if quote.shares.is_zero() {
            return Err(EngineError::JoinTooSmall { pool_id });
        }

        let mut refund = Vec::new();
        if !quote.base_refund.is_zero() {
            refund.push(AssetAmount {
                denom: pool.base.denom.clone(),
                amount: quote.base_refund,
            });
        }
        if !quote.quote_refund.is_zero() {
            refund.push(AssetAmount {
                denom: pool.quote.denom.clone(),
                amount: quote.quote_refund,
            });
        }
        self.pay_out(host, &ctx.caller, &refund)?;

        pool.base.balance = quote.reserve_base_after;
        pool.quote.balance = quote.reserve_quote_after;
        pool.touch(ctx.block_time);
        pool.total_shares = add(pool.total_shares, quote.shares)?;

        let minted = AssetAmount {
            denom: pool.shares_denom.clone(),
            amount: quote.shares,
        };
        host.mint(&minted)?;
        self.pay_out(host, &ctx.caller, std::slice::from_ref(&minted))?;

        self.commit(host, &pool)?;
        host.notify(PoolEvent::new(PoolEventKind::Joined, pool_id, ctx));

        info!(
            pool_id = %pool_id,
            sent_base = %sent_base,
            sent_quote = %sent_quote,
            shares = %quote.shares,
            refunds = refund.len(),
            caller = %ctx.caller,
            "Liquidity added"
        );

        Ok(JoinResult {
            pool_id,
            shares: quote.shares,
            share_denom: pool.shares_denom,
            refund,
        })
    }
}
