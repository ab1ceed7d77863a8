use crate::context::InvocationContext;
use crate::engine::AmmEngine;
use crate::error::EngineError;
use crate::events::{PoolEvent, PoolEventKind};
use crate::ports::{Host, PoolStore};
use chrono::{DateTime, Utc};
use cpamm_domain::prelude::{Amount, AssetAmount, Denom, Pool, PoolId, quote_swap};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Parameters of a swap beyond the attached input asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Pools to route through, in order.
    pub pool_ids: Vec<PoolId>,
    /// Smallest acceptable final output.
    pub minimum_out: Amount,
    /// Denomination the route must end in.
    pub out_denom: Denom,
}

/// Final output of a swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    /// Amount paid to the caller.
    pub output_amount: Amount,
    /// Denomination paid to the caller.
    pub output_denom: Denom,
}

impl From<SwapResult> for AssetAmount {
    fn from(result: SwapResult) -> Self {
        AssetAmount {
            denom: result.output_denom,
            amount: result.output_amount,
        }
    }
}

/// Prices one hop and applies it to the working copy of `pool`.
fn apply_hop(
    pool: &mut Pool,
    input: &AssetAmount,
    at: DateTime<Utc>,
) -> Result<AssetAmount, EngineError> {
    let side_in = pool
        .side_of(&input.denom)
        .ok_or_else(|| EngineError::RouteDenomMismatch {
            pool_id: pool.pool_id,
            denom: input.denom.clone(),
            base: pool.base.denom.clone(),
            quote: pool.quote.denom.clone(),
        })?;
    let side_out = side_in.opposite();

    let quote = quote_swap(
        input.amount,
        pool.reserve(side_in).balance,
        pool.reserve(side_out).balance,
    )?;
    if quote.amount_out.is_zero() {
        return Err(EngineError::SwapTooSmall {
            pool_id: pool.pool_id,
        });
    }
    if quote.reserve_out_after.is_zero() {
        return Err(EngineError::SwapTooLarge {
            pool_id: pool.pool_id,
        });
    }

    pool.reserve_mut(side_in).balance = quote.reserve_in_after;
    pool.reserve_mut(side_out).balance = quote.reserve_out_after;
    pool.record_trade(at);

    debug!(
        pool_id = %pool.pool_id,
        input = %input,
        amount_out = %quote.amount_out,
        invariant = %quote.invariant,
        "Swap hop priced"
    );

    Ok(AssetAmount {
        denom: pool.reserve(side_out).denom.clone(),
        amount: quote.amount_out,
    })
}

impl AmmEngine {
    /// Swaps the single attached asset through `request.pool_ids` in order.
    ///
    /// Each hop prices against the pool's current reserves with no fee and is
    /// written back before the next hop is loaded, so a route may pass the
    /// same pool twice. If a later hop fails, the host must discard the
    /// earlier writes. The final output is checked against the caller's
    /// minimum and denomination, then paid out in one transfer.
    ///
    /// # Errors
    /// - [`EngineError::AttachmentCount`] unless exactly one asset is attached
    /// - [`EngineError::EmptyRoute`] if the route is empty
    /// - [`EngineError::PoolNotFound`] per unknown hop
    /// - [`EngineError::RouteDenomMismatch`] if a hop cannot take the running asset
    /// - [`EngineError::SwapTooSmall`] / [`EngineError::SwapTooLarge`] on degenerate hops
    /// - [`EngineError::Slippage`] if the output is below the minimum
    /// - [`EngineError::OutputDenomMismatch`] if the route ends in another asset
    pub fn swap<H>(
        &self,
        host: &mut H,
        ctx: &InvocationContext,
        request: &SwapRequest,
    ) -> Result<SwapResult, EngineError>
    where
        H: Host + ?Sized,
    {
        let coins = self.attachments(ctx, 1)?;
        check_request(request)?;

        let mut running = coins[0].clone();
        for pool_id in &request.pool_ids {
            let mut pool = self.pool(host, *pool_id)?;
            running = apply_hop(&mut pool, &running, ctx.block_time)?;

            self.commit(host, &pool)?;
            host.notify(PoolEvent::new(PoolEventKind::Swapped, *pool_id, ctx));
        }

        let result = settle(request, running)?;
        let output = AssetAmount::from(result.clone());
        self.pay_out(host, &ctx.caller, std::slice::from_ref(&output))?;

        info!(
            input = %coins[0],
            output = %output,
            hops = request.pool_ids.len(),
            caller = %ctx.caller,
            "Swap executed"
        );

        Ok(result)
    }

    /// Prices a route without writing anything.
    ///
    /// Hops run against working copies, so a pool visited twice sees its own
    /// earlier hop. Applies the same minimum and denomination checks as
    /// [`AmmEngine::swap`].
    ///
    /// # Errors
    /// Same as [`AmmEngine::swap`], minus attachment validation.
    pub fn quote_route<S>(
        &self,
        store: &S,
        input: &AssetAmount,
        request: &SwapRequest,
        at: DateTime<Utc>,
    ) -> Result<SwapResult, EngineError>
    where
        S: PoolStore + ?Sized,
    {
        check_request(request)?;
        if input.amount.is_zero() {
            return Err(EngineError::NonPositiveAttachment {
                denom: input.denom.clone(),
            });
        }

        let mut working: BTreeMap<PoolId, Pool> = BTreeMap::new();
        let mut running = input.clone();
        for pool_id in &request.pool_ids {
            let mut pool = match working.remove(pool_id) {
                Some(pool) => pool,
                None => self.pool(store, *pool_id)?,
            };
            running = apply_hop(&mut pool, &running, at)?;
            working.insert(*pool_id, pool);
        }

        settle(request, running)
    }
}

fn check_request(request: &SwapRequest) -> Result<(), EngineError> {
    if request.pool_ids.is_empty() {
        return Err(EngineError::EmptyRoute);
    }
    Ok(())
}

fn settle(request: &SwapRequest, output: AssetAmount) -> Result<SwapResult, EngineError> {
    if output.amount < request.minimum_out {
        return Err(EngineError::Slippage {
            output: output.amount,
            minimum: request.minimum_out,
            denom: output.denom,
        });
    }
    if output.denom != request.out_denom {
        return Err(EngineError::OutputDenomMismatch {
            wanted: request.out_denom.clone(),
            got: output.denom,
        });
    }
    Ok(SwapResult {
        output_amount: output.amount,
        output_denom: output.denom,
    })
}
