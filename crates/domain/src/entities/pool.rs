use crate::entities::reserve::{Reserve, Side};
use crate::error::DomainError;
use crate::math::constant_product::calculate_spot_price;
use crate::value_objects::{Amount, Denom};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pool identifier, allocated once by the store and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub u64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PoolId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Derives the share token denomination of a pool: `{prefix}/{contract}/pool-{id}`.
pub fn derive_shares_denom(
    prefix: &str,
    contract: &str,
    pool_id: PoolId,
) -> Result<Denom, DomainError> {
    Denom::new(format!("{prefix}/{contract}/pool-{pool_id}"))
}

/// A two-asset constant product pool.
///
/// Invariants after every committed mutation:
/// - both reserve balances are strictly positive
/// - `total_shares` is strictly positive
/// - the two reserve denominations differ
/// - `pool_id`, `shares_denom` and both reserve denominations never change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Pool identifier.
    pub pool_id: PoolId,
    /// Listed asset reserve.
    pub base: Reserve,
    /// Anchor asset reserve.
    pub quote: Reserve,
    /// Outstanding share tokens.
    pub total_shares: Amount,
    /// Share token denomination.
    pub shares_denom: Denom,
    /// Block time at creation.
    pub created: DateTime<Utc>,
    /// Block time of the last mutation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    /// Block height at creation.
    pub block_height: u64,
    /// Number of swap hops routed through this pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_trades: Option<u64>,
}

impl Pool {
    /// Which side holds `denom`, if any.
    #[must_use]
    pub fn side_of(&self, denom: &Denom) -> Option<Side> {
        if self.base.denom == *denom {
            Some(Side::Base)
        } else if self.quote.denom == *denom {
            Some(Side::Quote)
        } else {
            None
        }
    }

    /// Reserve on the given side.
    #[must_use]
    pub fn reserve(&self, side: Side) -> &Reserve {
        match side {
            Side::Base => &self.base,
            Side::Quote => &self.quote,
        }
    }

    /// Mutable reserve on the given side.
    pub fn reserve_mut(&mut self, side: Side) -> &mut Reserve {
        match side {
            Side::Base => &mut self.base,
            Side::Quote => &mut self.quote,
        }
    }

    /// Price of one unit of base expressed in quote.
    pub fn spot_price(&self) -> Result<Decimal, DomainError> {
        calculate_spot_price(self.base.balance, self.quote.balance)
    }

    /// Marks the pool as mutated at `at`.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.updated = Some(at);
    }

    /// Marks one swap hop at `at`.
    pub fn record_trade(&mut self, at: DateTime<Utc>) {
        self.touch(at);
        self.num_trades = Some(self.num_trades.unwrap_or(0) + 1);
    }

    /// Returns true if `other` describes the same pool identity.
    #[must_use]
    pub fn same_identity(&self, other: &Pool) -> bool {
        self.pool_id == other.pool_id
            && self.shares_denom == other.shares_denom
            && self.base.denom == other.base.denom
            && self.quote.denom == other.quote.denom
    }

    /// Checks the record invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.base.denom == self.quote.denom {
            return Err(DomainError::InvariantViolation(
                "base and quote denominations must differ",
            ));
        }
        if self.base.balance.is_zero() {
            return Err(DomainError::InvariantViolation(
                "base balance must be positive",
            ));
        }
        if self.quote.balance.is_zero() {
            return Err(DomainError::InvariantViolation(
                "quote balance must be positive",
            ));
        }
        if self.total_shares.is_zero() {
            return Err(DomainError::InvariantViolation(
                "total shares must be positive",
            ));
        }
        Ok(())
    }
}
