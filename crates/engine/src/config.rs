//! Engine configuration.

use cpamm_domain::prelude::{Amount, Denom, DomainError, PoolId, derive_shares_denom};
use std::env;

/// Environment variable holding the contract's own address.
pub const ENV_CONTRACT_ADDRESS: &str = "CPAMM_CONTRACT_ADDRESS";
/// Environment variable holding the anchor asset denomination.
pub const ENV_ANCHOR_DENOM: &str = "CPAMM_ANCHOR_DENOM";
/// Environment variable holding the share denomination prefix.
pub const ENV_SHARE_DENOM_PREFIX: &str = "CPAMM_SHARE_DENOM_PREFIX";
/// Environment variable holding the bootstrap share supply.
pub const ENV_BOOTSTRAP_SHARES: &str = "CPAMM_BOOTSTRAP_SHARES";

/// Contract address used when none is configured.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "cpamm1contract";
/// Anchor denomination used when none is configured.
pub const DEFAULT_ANCHOR_DENOM: &str = "uanchor";
/// Share denomination prefix used when none is configured.
pub const DEFAULT_SHARE_DENOM_PREFIX: &str = "amm";
/// Shares minted to a pool creator when not configured.
pub const DEFAULT_BOOTSTRAP_SHARES: u64 = 100_000;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Configuration for the AMM engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Address of the contract itself; holds custody of pooled assets.
    pub contract_address: String,
    /// Network settlement asset every pool is quoted in.
    pub anchor_denom: Denom,
    /// First path segment of every share denomination.
    pub share_denom_prefix: String,
    /// Shares minted to the creator of a new pool.
    pub bootstrap_shares: Amount,
}

impl EngineConfig {
    /// Creates a configuration with the default share prefix and bootstrap
    /// supply.
    #[must_use]
    pub fn new(contract_address: impl Into<String>, anchor_denom: Denom) -> Self {
        Self {
            contract_address: contract_address.into(),
            anchor_denom,
            share_denom_prefix: DEFAULT_SHARE_DENOM_PREFIX.to_string(),
            bootstrap_shares: Amount::from(DEFAULT_BOOTSTRAP_SHARES),
        }
    }

    /// Builds a configuration from the environment, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let address =
            env::var(ENV_CONTRACT_ADDRESS).unwrap_or_else(|_| DEFAULT_CONTRACT_ADDRESS.to_string());
        if address.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: ENV_CONTRACT_ADDRESS,
                value: address,
            });
        }
        let denom =
            env::var(ENV_ANCHOR_DENOM).unwrap_or_else(|_| DEFAULT_ANCHOR_DENOM.to_string());
        let anchor = Denom::new(denom.clone()).map_err(|_| ConfigError::InvalidValue {
            key: ENV_ANCHOR_DENOM,
            value: denom,
        })?;

        let mut config = Self::new(address, anchor);
        if let Ok(prefix) = env::var(ENV_SHARE_DENOM_PREFIX) {
            config.share_denom_prefix = prefix;
        }
        if let Ok(raw) = env::var(ENV_BOOTSTRAP_SHARES) {
            config.bootstrap_shares = raw
                .parse::<Amount>()
                .ok()
                .filter(|shares| !shares.is_zero())
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_BOOTSTRAP_SHARES,
                    value: raw,
                })?;
        }

        // The prefix and address must combine into a legal denomination.
        config
            .shares_denom(PoolId(1))
            .map_err(|_| ConfigError::InvalidValue {
                key: ENV_SHARE_DENOM_PREFIX,
                value: config.share_denom_prefix.clone(),
            })?;

        Ok(config)
    }

    /// Share token denomination for a pool.
    pub fn shares_denom(&self, pool_id: PoolId) -> Result<Denom, DomainError> {
        derive_shares_denom(&self.share_denom_prefix, &self.contract_address, pool_id)
    }
}
