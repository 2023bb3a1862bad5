// Whole-value JSON persistence on top of a KeyValueStore

use crate::storage::KeyValueStore;
use eyre::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

/// Load a JSON value stored under `key`
///
/// Returns `T::default()` when the key is absent. Malformed content is logged
/// and also yields the default, since there is no user-facing error channel
/// for stale or hand-edited storage. Storage read failures still propagate.
pub fn load_or_default<T, S>(storage: &S, key: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let raw = match storage.get(key)? {
        Some(raw) => raw,
        None => {
            debug!(key, "No stored value, using default");
            return Ok(T::default());
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!(
                key,
                error = ?e,
                "Failed to parse stored JSON, using default"
            );
            Ok(T::default())
        }
    }
}

/// Serialize `value` as JSON and overwrite `key` with it
pub fn save<T, S>(storage: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value).context("Failed to serialize value")?;
    storage
        .set(key, &json)
        .wrap_err_with(|| format!("Failed to persist key {}", key))?;
    Ok(())
}
