use crate::error::DomainError;
use crate::math::rounding::{add, full_mul, mul_div_floor, sub};
use crate::value_objects::Amount;
use primitive_types::U512;
use rust_decimal::Decimal;

/// Result of pricing one swap hop against a pair of reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Amount leaving the pool on the output side.
    pub amount_out: Amount,
    /// Constant product `K = x * y` before the hop.
    pub invariant: U512,
    /// Input-side reserve after the hop.
    pub reserve_in_after: Amount,
    /// Output-side reserve after the hop. May be zero; callers reject that.
    pub reserve_out_after: Amount,
}

/// Prices a swap in a constant product pool (x * y = k) with no fee.
///
/// formula: out = ⌊y − k / (x + dx)⌋
///
/// Since `y * (x + dx) − k = y * dx`, the floor is taken over the single exact
/// division `⌊y * dx / (x + dx)⌋`.
pub fn quote_swap(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
) -> Result<SwapQuote, DomainError> {
    let invariant = calculate_k(reserve_in, reserve_out);
    let reserve_in_after = add(reserve_in, amount_in)?;
    let amount_out = mul_div_floor(reserve_out, amount_in, reserve_in_after)?;
    let reserve_out_after = sub(reserve_out, amount_out)?;

    Ok(SwapQuote {
        amount_out,
        invariant,
        reserve_in_after,
        reserve_out_after,
    })
}

/// Calculates the spot price of the input side in terms of the output side.
/// Price = reserve_out / reserve_in
pub fn calculate_spot_price(
    reserve_in: Amount,
    reserve_out: Amount,
) -> Result<Decimal, DomainError> {
    if reserve_in.is_zero() {
        return Err(DomainError::DivisionByZero {
            operation: "spot_price",
        });
    }
    reserve_out
        .to_decimal()?
        .checked_div(reserve_in.to_decimal()?)
        .ok_or(DomainError::Overflow {
            operation: "spot_price",
        })
}

/// Calculates the constant product K
#[must_use]
pub fn calculate_k(reserve0: Amount, reserve1: Amount) -> U512 {
    full_mul(reserve0, reserve1)
}
