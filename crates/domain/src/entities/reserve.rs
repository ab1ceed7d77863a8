use crate::value_objects::{Amount, Denom};
use serde::{Deserialize, Serialize};

/// Which side of a pool a reserve sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The listed asset.
    Base,
    /// The anchor asset.
    Quote,
}

impl Side {
    /// The other side of the pool.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Base => Self::Quote,
            Self::Quote => Self::Base,
        }
    }
}

/// One side of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserve {
    /// Asset held on this side.
    pub denom: Denom,
    /// Amount held by the pool.
    pub balance: Amount,
    /// Reserved for lending; not used by pool math.
    #[serde(default)]
    pub lent: Amount,
    /// Reserved for collateral accounting; not used by pool math.
    #[serde(default)]
    pub collateral: Amount,
}

impl Reserve {
    /// Creates a reserve with nothing lent or collateralised.
    #[must_use]
    pub fn new(denom: Denom, balance: Amount) -> Self {
        Self {
            denom,
            balance,
            lent: Amount::ZERO,
            collateral: Amount::ZERO,
        }
    }
}
