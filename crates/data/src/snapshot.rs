//! JSON state file.

use crate::host::LedgerState;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Loads host state from `path`. A missing file is a fresh ledger.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_state(path: &Path) -> Result<LedgerState> {
    if !path.exists() {
        info!(path = %path.display(), "No state file, starting fresh");
        return Ok(LedgerState::default());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    let state: LedgerState = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse state file {}", path.display()))?;
    debug!(
        path = %path.display(),
        records = state.storage.len(),
        block_height = state.block_height,
        "State loaded"
    );
    Ok(state)
}

/// Writes host state to `path`, replacing any previous file.
///
/// The state is written to a sibling temporary file first and renamed over
/// the target.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn save_state(path: &Path, state: &LedgerState) -> Result<()> {
    let raw = serde_json::to_string_pretty(state).context("Failed to encode state")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw)
        .with_context(|| format!("Failed to write state file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace state file {}", path.display()))?;
    debug!(path = %path.display(), block_height = state.block_height, "State saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_fresh_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_state(&dir.path().join("absent.json")).unwrap();
        assert_eq!(state, LedgerState::default());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_state(&path).is_err());
    }
}
