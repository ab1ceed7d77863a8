use crate::context::InvocationContext;
use crate::engine::AmmEngine;
use crate::error::EngineError;
use crate::events::{PoolEvent, PoolEventKind};
use crate::ports::Host;
use cpamm_domain::math::rounding::sub;
use cpamm_domain::prelude::{AssetAmount, PoolId, quote_exit};
use tracing::{error, info};

impl AmmEngine {
    /// Redeems attached pool shares for a proportional slice of both reserves.
    ///
    /// The ledger's share supply is cross-checked against the pool record
    /// before anything moves. The redeemed amounts are floored, zero sides are
    /// dropped, and the rest is returned sorted by denomination.
    ///
    /// # Errors
    /// - [`EngineError::AttachmentCount`] unless exactly one asset is attached
    /// - [`EngineError::SharesDenomMismatch`] if it is not the pool's share token
    /// - [`EngineError::PoolNotFound`] for unknown pools
    /// - [`EngineError::SharesSupplyMismatch`] if ledger and record disagree
    /// - [`EngineError::ExitTooSmall`] if both sides floor to zero
    /// - [`EngineError::ExitTooLarge`] if a reserve or the share supply would hit zero
    pub fn exit_pool<H>(
        &self,
        host: &mut H,
        ctx: &InvocationContext,
        pool_id: PoolId,
    ) -> Result<Vec<AssetAmount>, EngineError>
    where
        H: Host + ?Sized,
    {
        let coins = self.attachments(ctx, 1)?;
        let sent = &coins[0];

        let needed = self.shares_denom(pool_id)?;
        if sent.denom != needed {
            return Err(EngineError::SharesDenomMismatch {
                sent: sent.denom.clone(),
                needed,
            });
        }

        let mut pool = self.pool(host, pool_id)?;

        let supply = host.total_supply(&pool.shares_denom)?;
        if supply != pool.total_shares {
            error!(
                pool_id = %pool_id,
                recorded = %pool.total_shares,
                supply = %supply,
                "Share supply diverged from pool record"
            );
            return Err(EngineError::SharesSupplyMismatch {
                pool_id,
                recorded: pool.total_shares,
                supply,
            });
        }

        if sent.amount >= supply {
            return Err(EngineError::ExitTooLarge { pool_id });
        }

        let quote = quote_exit(sent.amount, pool.base.balance, pool.quote.balance, supply)?;
        if quote.is_empty() {
            return Err(EngineError::ExitTooSmall {
                shares: sent.clone(),
            });
        }

        pool.total_shares = sub(pool.total_shares, sent.amount)?;
        pool.base.balance = sub(pool.base.balance, quote.base_out)?;
        pool.quote.balance = sub(pool.quote.balance, quote.quote_out)?;
        if pool.total_shares.is_zero()
            || pool.base.balance.is_zero()
            || pool.quote.balance.is_zero()
        {
            return Err(EngineError::ExitTooLarge { pool_id });
        }
        pool.touch(ctx.block_time);

        host.burn(sent)?;

        let mut payout: Vec<AssetAmount> = [
            (&pool.base.denom, quote.base_out),
            (&pool.quote.denom, quote.quote_out),
        ]
        .into_iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(denom, amount)| AssetAmount {
            denom: denom.clone(),
            amount,
        })
        .collect();
        payout.sort_by(|a, b| a.denom.cmp(&b.denom));
        self.pay_out(host, &ctx.caller, &payout)?;

        self.commit(host, &pool)?;
        host.notify(PoolEvent::new(PoolEventKind::Exited, pool_id, ctx));

        info!(
            pool_id = %pool_id,
            shares = %sent.amount,
            base_out = %quote.base_out,
            quote_out = %quote.quote_out,
            caller = %ctx.caller,
            "Liquidity removed"
        );

        Ok(payout)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{EngineError, ErrorKind};
    use crate::events::PoolEventKind;
    use crate::ports::SupplyQuery;
    use crate::testing::{CALLER, MockHost, amt, seed_pool, test_engine};
    use crate::AmmEngine;
    use cpamm_domain::math::rounding::add;
    use cpamm_domain::prelude::{Amount, Denom, PoolId};

    const SHARES: &str = "amm/cpamm1contract/pool-1";

    fn setup() -> (AmmEngine, MockHost) {
        let engine = test_engine();
        let mut host = MockHost::new();
        seed_pool(&engine, &mut host, &["1000ufoo", "100000uanchor"]);
        (engine, host)
    }

    #[test]
    fn test_exit_pool() {
        let (engine, mut host) = setup();

        let ctx = host.invoke(CALLER, &[format!("10000{SHARES}").as_str()]);
        let payout = engine.exit_pool(&mut host, &ctx, PoolId(1)).unwrap();

        // 10% of the supply: 100 ufoo and 10000 uanchor, sorted by denom.
        assert_eq!(payout.len(), 2);
        assert_eq!(payout[0].denom.as_str(), "uanchor");
        assert_eq!(payout[0].amount, amt(10000));
        assert_eq!(payout[1].denom.as_str(), "ufoo");
        assert_eq!(payout[1].amount, amt(100));

        let pool = host.pools.get(&PoolId(1)).unwrap();
        assert_eq!(pool.total_shares, amt(90000));
        assert_eq!(pool.base.balance, amt(900));
        assert_eq!(pool.quote.balance, amt(90000));
        assert_eq!(host.total_supply(&pool.shares_denom).unwrap(), amt(90000));
        assert_eq!(host.balance(CALLER, "ufoo"), amt(100));
        assert_eq!(host.events.last().unwrap().kind, PoolEventKind::Exited);
    }

    #[test]
    fn test_exit_drops_zero_side() {
        let (engine, mut host) = setup();

        // floor(1 * 1000 / 100000) = 0 base, floor(1 * 100000 / 100000) = 1 quote.
        let ctx = host.invoke(CALLER, &[format!("1{SHARES}").as_str()]);
        let payout = engine.exit_pool(&mut host, &ctx, PoolId(1)).unwrap();
        assert_eq!(payout.len(), 1);
        assert_eq!(payout[0].denom.as_str(), "uanchor");
        assert_eq!(payout[0].amount, amt(1));
    }

    #[test]
    fn test_exit_value_too_small() {
        let engine = test_engine();
        let mut host = MockHost::new();
        seed_pool(&engine, &mut host, &["10ufoo", "10uanchor"]);

        let ctx = host.invoke(CALLER, &[format!("1{SHARES}").as_str()]);
        let err = engine.exit_pool(&mut host, &ctx, PoolId(1)).unwrap_err();
        assert!(matches!(err, EngineError::ExitTooSmall { .. }));
        assert_eq!(err.kind(), ErrorKind::Economic);
    }

    #[test]
    fn test_exit_wrong_denom() {
        let (engine, mut host) = setup();
        let ctx = host.invoke(CALLER, &["10ufoo"]);
        let err = engine.exit_pool(&mut host, &ctx, PoolId(1)).unwrap_err();
        assert!(matches!(err, EngineError::SharesDenomMismatch { .. }));

        // Shares of pool 1 cannot redeem pool 2.
        let ctx = host.invoke(CALLER, &[format!("10{SHARES}").as_str()]);
        let err = engine.exit_pool(&mut host, &ctx, PoolId(2)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_exit_unknown_pool() {
        let (engine, mut host) = setup();
        let ctx = host.invoke(CALLER, &["10amm/cpamm1contract/pool-7"]);
        let err = engine.exit_pool(&mut host, &ctx, PoolId(7)).unwrap_err();
        assert_eq!(err, EngineError::PoolNotFound(PoolId(7)));
    }

    #[test]
    fn test_exit_detects_supply_drift() {
        let (engine, mut host) = setup();
        host.supply.insert(Denom::new(SHARES).unwrap(), amt(100001));

        let ctx = host.invoke(CALLER, &[format!("10{SHARES}").as_str()]);
        let err = engine.exit_pool(&mut host, &ctx, PoolId(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Consistency);
    }

    #[test]
    fn test_exit_cannot_drain_pool() {
        let (engine, mut host) = setup();
        let ctx = host.invoke(CALLER, &[format!("100000{SHARES}").as_str()]);
        let err = engine.exit_pool(&mut host, &ctx, PoolId(1)).unwrap_err();
        assert_eq!(err, EngineError::ExitTooLarge { pool_id: PoolId(1) });

        // More shares than were ever issued is still an economic failure.
        let ctx = host.invoke(CALLER, &[format!("250000{SHARES}").as_str()]);
        let err = engine.exit_pool(&mut host, &ctx, PoolId(1)).unwrap_err();
        assert_eq!(err, EngineError::ExitTooLarge { pool_id: PoolId(1) });
        assert_eq!(host.pools[&PoolId(1)].total_shares, amt(100000));
    }

    #[test]
    fn test_join_then_exit_round_trip() {
        let (engine, mut host) = setup();

        let ctx = host.invoke("bob", &["10ufoo", "1000uanchor"]);
        let joined = engine.join_pool(&mut host, &ctx, PoolId(1)).unwrap();
        assert!(joined.refund.is_empty());

        let ctx = host.invoke("bob", &[format!("{}{SHARES}", joined.shares).as_str()]);
        let payout = engine.exit_pool(&mut host, &ctx, PoolId(1)).unwrap();

        let total_back = payout
            .iter()
            .try_fold(Amount::ZERO, |acc, a| add(acc, a.amount))
            .unwrap();
        assert_eq!(total_back, amt(1010));
        assert_eq!(host.balance("bob", "ufoo"), amt(10));
        assert_eq!(host.balance("bob", "uanchor"), amt(1000));
    }
}
