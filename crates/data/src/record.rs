//! Persisted pool records.
//!
//! Pools are stored as JSON under a zero-padded key so that lexical key order
//! matches pool id order. Every money field is written as a decimal string.

use cpamm_domain::prelude::{Pool, PoolId};
use cpamm_engine::HostError;

/// Key prefix of pool records.
pub const POOL_KEY_PREFIX: &str = "pools/";

/// Key of the id allocation counter.
pub const NEXT_POOL_ID_KEY: &str = "next_pool_id";

/// First id handed out by a fresh store.
pub const FIRST_POOL_ID: u64 = 1;

/// Storage key of a pool record.
#[must_use]
pub fn pool_key(pool_id: PoolId) -> String {
    format!("{POOL_KEY_PREFIX}{:015}", pool_id.0)
}

/// A pool as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRecord {
    /// Storage key.
    pub key: String,
    /// Encoded pool.
    pub value: String,
}

impl PoolRecord {
    /// Encodes a pool.
    ///
    /// # Errors
    /// Returns [`HostError::Codec`] if serialization fails.
    pub fn from_pool(pool: &Pool) -> Result<Self, HostError> {
        let value = serde_json::to_string(pool).map_err(|e| HostError::Codec(e.to_string()))?;
        Ok(Self {
            key: pool_key(pool.pool_id),
            value,
        })
    }

    /// Decodes the stored pool.
    ///
    /// # Errors
    /// Returns [`HostError::Codec`] if the value is not a valid pool or was
    /// stored under another pool's key.
    pub fn to_pool(&self) -> Result<Pool, HostError> {
        let pool: Pool = serde_json::from_str(&self.value)
            .map_err(|e| HostError::Codec(format!("{}: {e}", self.key)))?;
        if pool_key(pool.pool_id) != self.key {
            return Err(HostError::Codec(format!(
                "{}: holds pool {}",
                self.key, pool.pool_id
            )));
        }
        Ok(pool)
    }
}

/// Decodes the id allocation counter. A missing counter starts at
/// [`FIRST_POOL_ID`].
///
/// # Errors
/// Returns [`HostError::Codec`] if the stored counter is not an integer.
pub fn decode_next_id(value: Option<&str>) -> Result<u64, HostError> {
    match value {
        None => Ok(FIRST_POOL_ID),
        Some(raw) => raw
            .parse()
            .map_err(|_| HostError::Codec(format!("{NEXT_POOL_ID_KEY}: {raw}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cpamm_domain::prelude::{Amount, Denom, Reserve};

    fn pool() -> Pool {
        Pool {
            pool_id: PoolId(42),
            base: Reserve::new(
                Denom::new("aevm").unwrap(),
                "1000123456789012345678901234567".parse().unwrap(),
            ),
            quote: Reserve::new(Denom::new("uanchor").unwrap(), Amount::from(100000)),
            total_shares: Amount::from(100000),
            shares_denom: Denom::new("amm/cpamm1contract/pool-42").unwrap(),
            created: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            updated: None,
            block_height: 7,
            num_trades: None,
        }
    }

    #[test]
    fn test_pool_key_is_zero_padded() {
        assert_eq!(pool_key(PoolId(1)), "pools/000000000000001");
        assert_eq!(pool_key(PoolId(42)), "pools/000000000000042");
        assert!(pool_key(PoolId(9)) < pool_key(PoolId(10)));
    }

    #[test]
    fn test_record_writes_decimal_strings() {
        let record = PoolRecord::from_pool(&pool()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&record.value).unwrap();

        assert_eq!(json["base"]["balance"], "1000123456789012345678901234567");
        assert_eq!(json["base"]["lent"], "0");
        assert_eq!(json["total_shares"], "100000");
        assert!(json.get("updated").is_none());
        assert!(json.get("num_trades").is_none());
        assert_eq!(record.to_pool().unwrap(), pool());
    }

    #[test]
    fn test_record_rejects_foreign_key() {
        let mut record = PoolRecord::from_pool(&pool()).unwrap();
        record.key = pool_key(PoolId(43));
        assert!(matches!(record.to_pool(), Err(HostError::Codec(_))));

        let fractional = record
            .value
            .replace("1000123456789012345678901234567", "1000.5");
        let fractional = PoolRecord {
            key: pool_key(PoolId(42)),
            value: fractional,
        };
        assert!(matches!(fractional.to_pool(), Err(HostError::Codec(_))));

        let garbage = PoolRecord {
            key: pool_key(PoolId(1)),
            value: "{".to_string(),
        };
        assert!(matches!(garbage.to_pool(), Err(HostError::Codec(_))));
    }

    #[test]
    fn test_decode_next_id() {
        assert_eq!(decode_next_id(None).unwrap(), 1);
        assert_eq!(decode_next_id(Some("17")).unwrap(), 17);
        assert!(decode_next_id(Some("x")).is_err());
    }
}
