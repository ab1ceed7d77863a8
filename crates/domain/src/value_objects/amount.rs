use crate::error::DomainError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A non-negative quantity of an asset in its smallest unit.
///
/// Backed by a 256-bit unsigned integer. Serialized as a decimal string so
/// records stay readable and survive JSON number limits.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(pub U256);

impl Amount {
    /// Zero.
    pub const ZERO: Self = Self(U256([0; 4]));
    /// One base unit.
    pub const ONE: Self = Self(U256([1, 0, 0, 0]));
    /// Largest representable amount, `2^256 - 1`.
    pub const MAX: Self = Self(U256::MAX);

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Converts to a decimal for display-only ratios such as spot prices.
    ///
    /// # Errors
    /// Returns [`DomainError::Overflow`] above the decimal range (about 7.9e28).
    pub fn to_decimal(&self) -> Result<Decimal, DomainError> {
        Decimal::from_str(&self.0.to_string()).map_err(|_| DomainError::Overflow {
            operation: "to_decimal",
        })
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a base-10 integer. A trailing `.000` is tolerated; any non-zero
/// fractional digit is rejected rather than rounded away.
impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(DomainError::NegativeAmount(s.to_string()));
        }
        let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !digits(whole) || !digits(fraction) {
            return Err(DomainError::InvalidAmount(s.to_string()));
        }
        if fraction.bytes().any(|b| b != b'0') {
            return Err(DomainError::NonIntegralAmount(s.to_string()));
        }
        U256::from_dec_str(whole)
            .map(Self)
            .map_err(|_| DomainError::InvalidAmount(s.to_string()))
    }
}

impl TryFrom<String> for Amount {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.to_string()
    }
}
