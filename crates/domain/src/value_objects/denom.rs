use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a denomination.
pub const MAX_DENOM_LEN: usize = 128;

/// Identifier of a fungible asset, e.g. `uatom` or `amm/cpamm1xyz/pool-1`.
///
/// Must start with an ASCII letter and contain only ASCII alphanumerics and
/// `/ : . _ -`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Denom(String);

impl Denom {
    /// Creates a validated denomination.
    pub fn new(denom: impl Into<String>) -> Result<Self, DomainError> {
        let denom = denom.into();
        let mut chars = denom.chars();
        let valid_head = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let valid_tail =
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'));

        if !valid_head || !valid_tail || denom.len() > MAX_DENOM_LEN {
            return Err(DomainError::InvalidDenom(denom));
        }
        Ok(Self(denom))
    }

    /// Returns the denomination as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Denom {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Denom {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Denom> for String {
    fn from(denom: Denom) -> Self {
        denom.0
    }
}
