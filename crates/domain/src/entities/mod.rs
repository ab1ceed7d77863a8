pub mod pool;
pub mod reserve;

// Re-export for easier access
pub use pool::{Pool, PoolId, derive_shares_denom};
pub use reserve::{Reserve, Side};
