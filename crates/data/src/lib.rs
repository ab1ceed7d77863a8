//! Reference host for the constant-product market maker.
//!
//! Provides the record codec used to persist pools, an in-memory
//! implementation of every engine collaborator with all-or-nothing
//! invocations, and a JSON state file for carrying that state between runs.

/// In-memory host.
pub mod host;
/// Pool record codec.
pub mod record;
/// State file persistence.
pub mod snapshot;

pub use host::{LedgerState, MemoryHost};
pub use record::{NEXT_POOL_ID_KEY, PoolRecord, pool_key};
pub use snapshot::{load_state, save_state};
