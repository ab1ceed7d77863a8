//! Exact integer arithmetic with explicit rounding direction.
//!
//! Every helper is checked: overflow, underflow and division by zero surface
//! as [`DomainError`] instead of panicking. Products are formed in 512 bits,
//! so `a * b / d` is exact for any pair of amounts and only the final
//! quotient has to fit back into an [`Amount`].

use crate::error::DomainError;
use crate::value_objects::Amount;
use primitive_types::{U256, U512};

/// Checked addition.
pub fn add(a: Amount, b: Amount) -> Result<Amount, DomainError> {
    a.0.checked_add(b.0)
        .map(Amount)
        .ok_or(DomainError::Overflow { operation: "add" })
}

/// Checked subtraction. Fails when `b > a`.
pub fn sub(a: Amount, b: Amount) -> Result<Amount, DomainError> {
    a.0.checked_sub(b.0)
        .map(Amount)
        .ok_or(DomainError::Underflow { operation: "sub" })
}

/// Full-width product; never overflows.
#[must_use]
pub fn full_mul(a: Amount, b: Amount) -> U512 {
    a.0.full_mul(b.0)
}

/// `⌊a * b / d⌋` with a 512-bit intermediate product.
pub fn mul_div_floor(a: Amount, b: Amount, d: Amount) -> Result<Amount, DomainError> {
    let (quotient, _) = divide(a, b, d, "mul_div_floor")?;
    narrow(quotient, "mul_div_floor")
}

/// `⌈a * b / d⌉` with a 512-bit intermediate product.
pub fn mul_div_ceil(a: Amount, b: Amount, d: Amount) -> Result<Amount, DomainError> {
    let (quotient, remainder) = divide(a, b, d, "mul_div_ceil")?;
    if remainder.is_zero() {
        narrow(quotient, "mul_div_ceil")
    } else {
        // quotient <= (2^256 - 1)^2, so the increment stays inside 512 bits.
        narrow(quotient + U512::one(), "mul_div_ceil")
    }
}

fn divide(
    a: Amount,
    b: Amount,
    d: Amount,
    operation: &'static str,
) -> Result<(U512, U512), DomainError> {
    if d.is_zero() {
        return Err(DomainError::DivisionByZero { operation });
    }
    Ok(full_mul(a, b).div_mod(U512::from(d.0)))
}

fn narrow(value: U512, operation: &'static str) -> Result<Amount, DomainError> {
    U256::try_from(value)
        .map(Amount)
        .map_err(|_| DomainError::Overflow { operation })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    fn big(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_mul_div_floor_exact_and_inexact() {
        assert_eq!(mul_div_floor(amt(10), amt(10), amt(10)).unwrap(), amt(10));
        assert_eq!(mul_div_floor(amt(1000), amt(1000), amt(1010)).unwrap(), amt(990));
        assert_eq!(mul_div_floor(amt(7), amt(1), amt(2)).unwrap(), amt(3));
        assert_eq!(mul_div_floor(amt(0), amt(5), amt(3)).unwrap(), amt(0));
    }

    #[test]
    fn test_mul_div_ceil_rounds_up_only_with_remainder() {
        assert_eq!(mul_div_ceil(amt(10), amt(10), amt(10)).unwrap(), amt(10));
        assert_eq!(mul_div_ceil(amt(7), amt(1), amt(2)).unwrap(), amt(4));
        assert_eq!(mul_div_ceil(amt(99), amt(1000), amt(100000)).unwrap(), amt(1));
        assert_eq!(mul_div_ceil(amt(0), amt(5), amt(3)).unwrap(), amt(0));
    }

    #[test]
    fn test_mul_div_keeps_every_digit_of_the_product() {
        // The product has 36 significant digits; nothing may be rescaled away.
        let a = big("123456789123456789");
        let b = big("987654321987654321");
        assert_eq!(
            mul_div_floor(a, b, Amount::ONE).unwrap(),
            big("121932631356500531347203169112635269")
        );
        assert_eq!(
            mul_div_floor(a, b, big("1000000000000000000")).unwrap(),
            big("121932631356500531")
        );
        assert_eq!(
            mul_div_ceil(a, b, big("1000000000000000000")).unwrap(),
            big("121932631356500532")
        );
    }

    #[test]
    fn test_intermediate_product_beyond_256_bits() {
        assert_eq!(
            mul_div_floor(Amount::MAX, Amount::MAX, Amount::MAX).unwrap(),
            Amount::MAX
        );
        assert_eq!(
            mul_div_ceil(Amount::MAX, amt(3), amt(4)).unwrap(),
            big("86844066927987146567678238756515930889952488499230423029593188005934847229952")
        );
    }

    #[test]
    fn test_quotient_overflow_is_reported() {
        assert_eq!(
            mul_div_floor(Amount::MAX, amt(2), Amount::ONE),
            Err(DomainError::Overflow {
                operation: "mul_div_floor"
            })
        );
        assert_eq!(
            add(Amount::MAX, Amount::ONE),
            Err(DomainError::Overflow { operation: "add" })
        );
    }

    #[test]
    fn test_sub_underflow_is_reported() {
        assert_eq!(sub(amt(10), amt(3)).unwrap(), amt(7));
        assert_eq!(
            sub(amt(3), amt(10)),
            Err(DomainError::Underflow { operation: "sub" })
        );
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(
            mul_div_floor(amt(1), amt(1), Amount::ZERO),
            Err(DomainError::DivisionByZero { .. })
        ));
        assert!(mul_div_ceil(amt(1), amt(1), Amount::ZERO).is_err());
    }
}
