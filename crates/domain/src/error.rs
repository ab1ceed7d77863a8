//! Errors raised by pool arithmetic and invariant checks.

/// Errors produced inside the domain model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A checked integer operation left the 256-bit range.
    #[error("Arithmetic overflow while computing {operation}")]
    Overflow {
        /// Operation that overflowed.
        operation: &'static str,
    },
    /// A subtraction would have produced a negative amount.
    #[error("Arithmetic underflow while computing {operation}")]
    Underflow {
        /// Operation that underflowed.
        operation: &'static str,
    },
    /// Division by a zero denominator.
    #[error("Division by zero while computing {operation}")]
    DivisionByZero {
        /// Operation that divided by zero.
        operation: &'static str,
    },
    /// A pool record breaks one of its invariants.
    #[error("Pool invariant violated: {0}")]
    InvariantViolation(&'static str),
    /// An amount string could not be parsed.
    #[error("Invalid asset amount: {0}")]
    InvalidAmount(String),
    /// An amount carries a fractional part; assets move in whole base units.
    #[error("Asset amount {0} is not a whole number of base units")]
    NonIntegralAmount(String),
    /// A negative amount was supplied where only non-negative values are allowed.
    #[error("Negative asset amount: {0}")]
    NegativeAmount(String),
    /// A denomination string is empty or contains illegal characters.
    #[error("Invalid denomination: {0:?}")]
    InvalidDenom(String),
}
