//! Engine errors.
//!
//! Every error aborts the invocation; nothing is retried inside the engine.

use crate::ports::HostError;
use cpamm_domain::prelude::{Amount, AssetAmount, Denom, DomainError, PoolId};
use serde::Serialize;

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input, wrong attachment count or wrong denomination.
    Validation,
    /// Unknown pool id.
    NotFound,
    /// A swap hop received an asset the pool does not hold.
    Routing,
    /// Trade or redemption size is degenerate.
    Economic,
    /// Swap output below the caller's minimum.
    Slippage,
    /// Recorded state disagrees with the ledger or breaks an invariant.
    Consistency,
    /// Integer overflow, underflow or division by zero.
    Arithmetic,
    /// A collaborator failed.
    Host,
}

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Wrong number of distinct attached denominations.
    #[error("Expected {expected} attached asset(s), got {got}")]
    AttachmentCount {
        /// Required number of denominations.
        expected: usize,
        /// Number attached.
        got: usize,
    },
    /// An attached amount is zero.
    #[error("Attached amount of {denom} must be positive")]
    NonPositiveAttachment {
        /// Offending denomination.
        denom: Denom,
    },
    /// Neither attached asset is the anchor asset.
    #[error("No {anchor} attached, cannot create pool")]
    MissingAnchor {
        /// Anchor denomination.
        anchor: Denom,
    },
    /// An attached asset is not one of the pool's reserves.
    #[error("Attached {denom} is not held by pool {pool_id} [{base}, {quote}]")]
    UnexpectedDenom {
        /// Target pool.
        pool_id: PoolId,
        /// Offending denomination.
        denom: Denom,
        /// Pool base denomination.
        base: Denom,
        /// Pool quote denomination.
        quote: Denom,
    },
    /// Exit was attempted with something other than the pool's shares.
    #[error("Invalid shares denom, sent [{sent}] needed [{needed}]")]
    SharesDenomMismatch {
        /// Attached denomination.
        sent: Denom,
        /// Pool share denomination.
        needed: Denom,
    },
    /// Swap route has no pools.
    #[error("Swap route must contain at least one pool")]
    EmptyRoute,
    /// Swap ended in a different asset than requested.
    #[error("Output denom doesn't match, wanted: {wanted} got: {got}")]
    OutputDenomMismatch {
        /// Requested output denomination.
        wanted: Denom,
        /// Actual output denomination.
        got: Denom,
    },
    /// Unknown pool id.
    #[error("Pool {0} not found")]
    PoolNotFound(PoolId),
    /// A hop received an asset the pool does not hold.
    #[error("Pool {pool_id} cannot take {denom}, input denom must be one of [{base}, {quote}]")]
    RouteDenomMismatch {
        /// Hop pool.
        pool_id: PoolId,
        /// Incoming denomination.
        denom: Denom,
        /// Pool base denomination.
        base: Denom,
        /// Pool quote denomination.
        quote: Denom,
    },
    /// Hop output floored to zero.
    #[error("Swap size too small for pool {pool_id}")]
    SwapTooSmall {
        /// Hop pool.
        pool_id: PoolId,
    },
    /// Hop would empty the output reserve.
    #[error("Swap size too large for pool {pool_id}")]
    SwapTooLarge {
        /// Hop pool.
        pool_id: PoolId,
    },
    /// Deposit would mint no shares.
    #[error("Deposit too small to mint shares of pool {pool_id}")]
    JoinTooSmall {
        /// Target pool.
        pool_id: PoolId,
    },
    /// Redemption floors to zero on both sides.
    #[error("Shares [{shares}] value too small to exchange")]
    ExitTooSmall {
        /// Attached shares.
        shares: AssetAmount,
    },
    /// Redemption would empty a reserve or the share supply.
    #[error("Exit would drain pool {pool_id}")]
    ExitTooLarge {
        /// Target pool.
        pool_id: PoolId,
    },
    /// Final output is below the caller's floor.
    #[error(
        "Slippage occurred, minimum output amount not reached: {output}{denom} < {minimum}{denom}"
    )]
    Slippage {
        /// Actual output.
        output: Amount,
        /// Requested minimum.
        minimum: Amount,
        /// Output denomination.
        denom: Denom,
    },
    /// Ledger supply of the share token disagrees with the pool record.
    #[error("Total shares mismatch, pool {pool_id} records {recorded} but supply is {supply}")]
    SharesSupplyMismatch {
        /// Target pool.
        pool_id: PoolId,
        /// `total_shares` on the record.
        recorded: Amount,
        /// Supply reported by the ledger.
        supply: Amount,
    },
    /// A mutation changed the id, share denomination or reserve assets of a
    /// stored pool.
    #[error("Pool {pool_id} identity changed, stored [{stored}] updated [{updated}]")]
    PoolIdentityChanged {
        /// Target pool.
        pool_id: PoolId,
        /// Share denomination on the stored record.
        stored: Denom,
        /// Share denomination on the rejected update.
        updated: Denom,
    },
    /// Domain arithmetic or invariant failure.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Collaborator failure.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl EngineError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AttachmentCount { .. }
            | Self::NonPositiveAttachment { .. }
            | Self::MissingAnchor { .. }
            | Self::UnexpectedDenom { .. }
            | Self::SharesDenomMismatch { .. }
            | Self::EmptyRoute
            | Self::OutputDenomMismatch { .. } => ErrorKind::Validation,
            Self::PoolNotFound(_) => ErrorKind::NotFound,
            Self::RouteDenomMismatch { .. } => ErrorKind::Routing,
            Self::SwapTooSmall { .. }
            | Self::SwapTooLarge { .. }
            | Self::JoinTooSmall { .. }
            | Self::ExitTooSmall { .. }
            | Self::ExitTooLarge { .. } => ErrorKind::Economic,
            Self::Slippage { .. } => ErrorKind::Slippage,
            Self::SharesSupplyMismatch { .. } | Self::PoolIdentityChanged { .. } => {
                ErrorKind::Consistency
            }
            Self::Domain(err) => match err {
                DomainError::Overflow { .. }
                | DomainError::Underflow { .. }
                | DomainError::DivisionByZero { .. } => ErrorKind::Arithmetic,
                DomainError::InvariantViolation(_) => ErrorKind::Consistency,
                DomainError::InvalidAmount(_)
                | DomainError::NonIntegralAmount(_)
                | DomainError::NegativeAmount(_)
                | DomainError::InvalidDenom(_) => ErrorKind::Validation,
            },
            Self::Host(_) => ErrorKind::Host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(EngineError::EmptyRoute.kind(), ErrorKind::Validation);
        assert_eq!(EngineError::PoolNotFound(PoolId(9)).kind(), ErrorKind::NotFound);
        assert_eq!(
            EngineError::from(DomainError::Overflow { operation: "mul" }).kind(),
            ErrorKind::Arithmetic
        );
        assert_eq!(
            EngineError::from(DomainError::NonIntegralAmount("2.5".into())).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            EngineError::from(DomainError::InvariantViolation("x")).kind(),
            ErrorKind::Consistency
        );
        assert_eq!(
            EngineError::from(HostError::Missing("pools/1".into())).kind(),
            ErrorKind::Host
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(EngineError::PoolNotFound(PoolId(7)).to_string(), "Pool 7 not found");
    }
}
