use crate::error::DomainError;
use crate::value_objects::amount::Amount;
use crate::value_objects::denom::Denom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An amount of a single asset, in whole base units of its denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAmount {
    /// Asset denomination.
    pub denom: Denom,
    /// Amount, serialized as a decimal string.
    pub amount: Amount,
}

impl AssetAmount {
    /// Creates an asset amount.
    #[must_use]
    pub fn new(denom: Denom, amount: Amount) -> Self {
        Self { denom, amount }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Parses the coin notation `<amount><denom>`, e.g. `1000uatom`.
///
/// The amount must be a whole number of base units: `2.5ufoo` is rejected
/// with [`DomainError::NonIntegralAmount`].
impl FromStr for AssetAmount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| DomainError::InvalidAmount(s.to_string()))?;
        let (amount, denom) = s.split_at(split);

        if amount.is_empty() {
            return Err(DomainError::InvalidAmount(s.to_string()));
        }
        Ok(Self::new(Denom::new(denom)?, amount.parse()?))
    }
}
