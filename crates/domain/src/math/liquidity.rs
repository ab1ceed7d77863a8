//! Liquidity share issuance and redemption.
//!
//! Shares are minted and redeemed proportionally to the pool reserves.
//! Rounding always favours the pool: the amount a depositor "should" have sent
//! is rounded up, minted and redeemed shares are rounded down.

use crate::error::DomainError;
use crate::math::rounding::{add, mul_div_ceil, mul_div_floor, sub};
use crate::value_objects::Amount;

/// Outcome of pricing a proportional deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinQuote {
    /// Base amount that matches the sent quote amount at the current ratio.
    pub correct_base: Amount,
    /// Quote amount that matches the sent base amount at the current ratio.
    pub correct_quote: Amount,
    /// Excess base returned to the depositor (zero when not over-supplied).
    pub base_refund: Amount,
    /// Excess quote returned to the depositor (zero when not over-supplied).
    pub quote_refund: Amount,
    /// Shares justified by the base side alone.
    pub base_shares: Amount,
    /// Shares justified by the quote side alone.
    pub quote_shares: Amount,
    /// Shares actually minted: the smaller of the two sides.
    pub shares: Amount,
    /// Base reserve after the deposit.
    pub reserve_base_after: Amount,
    /// Quote reserve after the deposit.
    pub reserve_quote_after: Amount,
}

/// Prices a two-sided deposit against the current reserves.
///
/// The reserves absorb the full sent amounts; the refunds are reported
/// separately and are not subtracted from `reserve_*_after`. Share counts use
/// the pre-deposit reserves.
pub fn quote_join(
    sent_base: Amount,
    sent_quote: Amount,
    reserve_base: Amount,
    reserve_quote: Amount,
    total_shares: Amount,
) -> Result<JoinQuote, DomainError> {
    let correct_base = mul_div_ceil(sent_quote, reserve_base, reserve_quote)?;
    let correct_quote = mul_div_ceil(sent_base, reserve_quote, reserve_base)?;

    let base_refund = excess(sent_base, correct_base)?;
    let quote_refund = excess(sent_quote, correct_quote)?;

    let base_shares = mul_div_floor(sent_base, total_shares, reserve_base)?;
    let quote_shares = mul_div_floor(sent_quote, total_shares, reserve_quote)?;

    Ok(JoinQuote {
        correct_base,
        correct_quote,
        base_refund,
        quote_refund,
        base_shares,
        quote_shares,
        shares: base_shares.min(quote_shares),
        reserve_base_after: add(reserve_base, sent_base)?,
        reserve_quote_after: add(reserve_quote, sent_quote)?,
    })
}

fn excess(sent: Amount, correct: Amount) -> Result<Amount, DomainError> {
    if sent > correct {
        sub(sent, correct)
    } else {
        Ok(Amount::ZERO)
    }
}

/// Amounts released by redeeming shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitQuote {
    /// Base released to the holder.
    pub base_out: Amount,
    /// Quote released to the holder.
    pub quote_out: Amount,
}

impl ExitQuote {
    /// Both sides floored to zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_out.is_zero() && self.quote_out.is_zero()
    }
}

/// Prices a share redemption: `⌊shares * reserve / total_shares⌋` per side.
pub fn quote_exit(
    shares: Amount,
    reserve_base: Amount,
    reserve_quote: Amount,
    total_shares: Amount,
) -> Result<ExitQuote, DomainError> {
    Ok(ExitQuote {
        base_out: mul_div_floor(shares, reserve_base, total_shares)?,
        quote_out: mul_div_floor(shares, reserve_quote, total_shares)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::rounding::full_mul;
    use primitive_types::U256;

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    #[test]
    fn test_join_at_ratio_has_no_refund() {
        let quote = quote_join(amt(10), amt(1000), amt(1000), amt(100000), amt(100000)).unwrap();

        assert_eq!(quote.correct_base, amt(10));
        assert_eq!(quote.correct_quote, amt(1000));
        assert!(quote.base_refund.is_zero());
        assert!(quote.quote_refund.is_zero());
        assert_eq!(quote.shares, amt(1000));
        assert_eq!(quote.reserve_base_after, amt(1010));
        assert_eq!(quote.reserve_quote_after, amt(101000));
    }

    #[test]
    fn test_join_over_supplied_base_is_refunded() {
        let quote = quote_join(amt(15), amt(1000), amt(1000), amt(100000), amt(100000)).unwrap();

        assert_eq!(quote.base_refund, amt(5));
        assert!(quote.quote_refund.is_zero());
        assert_eq!(quote.base_shares, amt(1500));
        assert_eq!(quote.quote_shares, amt(1000));
        assert_eq!(quote.shares, amt(1000));
        // The full sent amount still lands in the reserve.
        assert_eq!(quote.reserve_base_after, amt(1015));
    }

    #[test]
    fn test_join_ceiling_on_correct_amount() {
        // correct_base = ceil(99 * 1000 / 100000) = ceil(0.99) = 1, so no base refund.
        let quote = quote_join(amt(1), amt(99), amt(1000), amt(100000), amt(100000)).unwrap();

        assert_eq!(quote.correct_base, amt(1));
        assert_eq!(quote.correct_quote, amt(100));
        assert!(quote.base_refund.is_zero());
        assert!(quote.quote_refund.is_zero());
        assert_eq!(quote.shares, amt(99));
    }

    #[test]
    fn test_join_never_mints_beyond_best_side() {
        let deposits = [
            (amt(10), amt(1000)),
            (amt(7), amt(3)),
            (amt(1), amt(100000)),
            (amt(333), amt(33333)),
        ];
        let (bb, bq, total) = (amt(1000), amt(100000), amt(100000));

        for (sb, sq) in deposits {
            let quote = quote_join(sb, sq, bb, bq, total).unwrap();
            let after = add(total, quote.shares).unwrap();
            // shares / after <= max(sb / bb, sq / bq), cross-multiplied.
            let within_base = full_mul(quote.shares, bb) <= full_mul(sb, after);
            let within_quote = full_mul(quote.shares, bq) <= full_mul(sq, after);
            assert!(within_base || within_quote, "sb={sb} sq={sq}");
            assert!(quote.shares <= quote.base_shares);
            assert!(quote.shares <= quote.quote_shares);
        }
    }

    #[test]
    fn test_join_then_exit_returns_deposit() {
        let join = quote_join(amt(10), amt(1000), amt(1000), amt(100000), amt(100000)).unwrap();
        let exit = quote_exit(
            join.shares,
            join.reserve_base_after,
            join.reserve_quote_after,
            add(amt(100000), join.shares).unwrap(),
        )
        .unwrap();

        assert_eq!(exit.base_out, amt(10));
        assert_eq!(exit.quote_out, amt(1000));
    }

    #[test]
    fn test_join_with_eighteen_decimal_reserves() {
        // 1000 tokens at 18 decimals paired with 1000 tokens at 6 decimals.
        let bb = Amount(U256::exp10(21));
        let bq = amt(1_000_000_000);
        let total = amt(100000);

        let quote = quote_join(Amount(U256::exp10(18)), amt(1_000_000), bb, bq, total).unwrap();
        assert_eq!(quote.correct_base, Amount(U256::exp10(18)));
        assert_eq!(quote.correct_quote, amt(1_000_000));
        assert_eq!(quote.shares, amt(100));
        assert_eq!(quote.reserve_base_after, Amount(U256::exp10(21) + U256::exp10(18)));
    }

    #[test]
    fn test_exit_floors_each_side() {
        let exit = quote_exit(amt(1), amt(1000), amt(100000), amt(100000)).unwrap();
        assert_eq!(exit.base_out, amt(0));
        assert_eq!(exit.quote_out, amt(1));
        assert!(!exit.is_empty());

        let dust = quote_exit(amt(1), amt(10), amt(10), amt(100000)).unwrap();
        assert!(dust.is_empty());
    }
}
