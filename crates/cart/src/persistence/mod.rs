//! Durable cart snapshots.
//!
//! The whole cart map is written to a single key-value slot after every
//! mutation and read back once at startup. Storage is a convenience cache:
//! anything unreadable loads as an empty map instead of failing.
//!
//! # Slot format
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "savedAt": "2026-01-01T00:00:00Z",
//!   "carts": [["<businessId>", { "businessId": "...", "lines": [...] }]]
//! }
//! ```
//!
//! The map is flattened to `[key, value]` pairs. A bare pair array with no
//! envelope is the unversioned legacy form and still loads.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use markethub_core::BusinessId;

use crate::models::{BusinessCart, Carts};

/// Well-known slot name for the cart snapshot.
pub const DEFAULT_SLOT_KEY: &str = "marketplace-carts";

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Whether `key` can name a slot in every backend: non-empty, ASCII
/// alphanumerics plus `-`, `_` and `.`, and no leading `.`.
#[must_use]
pub fn is_valid_slot_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Slot key is not usable by this backend.
    #[error("Invalid slot key: {0}")]
    InvalidKey(String),
}

/// A string key-value slot store.
///
/// Backends only move strings; encoding is the adapter's job.
pub trait CartStorage {
    /// Read the value under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn write(&mut self, key: &str, data: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    schema_version: u32,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
    carts: Vec<(BusinessId, BusinessCart)>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Versioned(Snapshot),
    Legacy(Vec<(BusinessId, BusinessCart)>),
}

/// Saves and restores a cart map through a [`CartStorage`] backend.
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    storage: S,
    key: String,
}

impl<S: CartStorage> PersistenceAdapter<S> {
    /// Create an adapter using [`DEFAULT_SLOT_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_SLOT_KEY)
    }

    /// Create an adapter using a custom slot key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The slot key this adapter reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Serialize the full cart map into the slot.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if encoding or the backend write fails.
    pub fn save(&mut self, carts: &Carts) -> Result<(), StorageError> {
        let snapshot = Snapshot {
            schema_version: SCHEMA_VERSION,
            saved_at: Some(Utc::now()),
            carts: carts
                .iter()
                .map(|(id, cart)| (id.clone(), cart.clone()))
                .collect(),
        };
        let data = serde_json::to_string(&snapshot)?;
        self.storage.write(&self.key, &data)?;
        tracing::trace!(key = %self.key, carts = carts.len(), "Saved cart snapshot");
        Ok(())
    }

    /// Read the slot back into a cart map.
    ///
    /// Missing, unreadable, corrupt, or future-version slots all yield an
    /// empty map. Empty carts in the snapshot are dropped.
    #[must_use]
    pub fn load(&self) -> Carts {
        let data = match self.storage.read(&self.key) {
            Ok(Some(data)) => data,
            Ok(None) => return Carts::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read cart snapshot");
                return Carts::new();
            }
        };

        match decode(&data) {
            Ok(carts) => {
                tracing::debug!(key = %self.key, carts = carts.len(), "Loaded cart snapshot");
                carts
            }
            Err(reason) => {
                tracing::warn!(key = %self.key, %reason, "Discarding unreadable cart snapshot");
                Carts::new()
            }
        }
    }

    /// Delete the slot entirely.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the backend write fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }
}

fn decode(data: &str) -> Result<Carts, String> {
    let pairs = match serde_json::from_str::<StoredSnapshot>(data).map_err(|e| e.to_string())? {
        StoredSnapshot::Versioned(snapshot) if snapshot.schema_version > SCHEMA_VERSION => {
            return Err(format!(
                "unsupported schema version {} (max {SCHEMA_VERSION})",
                snapshot.schema_version
            ));
        }
        StoredSnapshot::Versioned(snapshot) => snapshot.carts,
        StoredSnapshot::Legacy(pairs) => pairs,
    };

    Ok(pairs
        .into_iter()
        .map(|(id, cart)| {
            let cart = cart.normalized(id.clone());
            (id, cart)
        })
        .filter(|(_, cart)| !cart.is_empty())
        .collect())
}
