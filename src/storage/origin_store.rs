//! OriginStorage: in-memory key/value tables partitioned by sender origin.
//!
//! Each origin gets its own table, created on the first successful write and
//! kept for the lifetime of the store. Writes are quota-checked per origin:
//! once a table is at or over its byte or key limit, only writes that do not
//! grow its footprint (same-size or smaller replacements, deletes) are
//! accepted.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::config::QuotaConfig;

// ============================================================================
// OriginTable
// ============================================================================

/// Key/value table for a single origin, with its byte usage tracked
/// incrementally.
#[derive(Debug, Default)]
struct OriginTable {
    entries: HashMap<String, String>,
    /// Sum of `key.len() + value.len()` over all entries.
    bytes: usize,
}

impl OriginTable {
    /// Signed byte delta this write would add to the table.
    fn additional_bytes(&self, key: &str, value: &str) -> i64 {
        match self.entries.get(key) {
            Some(old) => value.len() as i64 - old.len() as i64,
            None => (key.len() + value.len()) as i64,
        }
    }

    fn insert(&mut self, key: &str, value: String) {
        let added = value.len();
        match self.entries.insert(key.to_string(), value) {
            Some(old) => self.bytes = self.bytes - old.len() + added,
            None => self.bytes += key.len() + added,
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(old) = self.entries.remove(key) {
            self.bytes -= key.len() + old.len();
        }
    }

    fn reached_limit(&self, quota: &QuotaConfig) -> bool {
        quota.byte_limit().is_some_and(|limit| self.bytes >= limit)
            || quota
                .key_limit()
                .is_some_and(|limit| self.entries.len() >= limit)
    }

    fn usage(&self) -> StorageUsage {
        StorageUsage {
            keys: self.entries.len(),
            bytes: self.bytes,
        }
    }
}

// ============================================================================
// StorageUsage
// ============================================================================

/// Current footprint of one origin's table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageUsage {
    pub keys: usize,
    pub bytes: usize,
}

// ============================================================================
// OriginStorage
// ============================================================================

/// Origin-scoped key/value store with per-origin quota.
///
/// The whole origin map sits behind one `parking_lot::Mutex`, so the quota
/// check and the write in `try_put` happen under a single lock acquisition.
/// Uncontended locks are near-zero overhead on single-threaded WASM.
#[derive(Debug)]
pub struct OriginStorage {
    quota: QuotaConfig,
    /// origin → table
    tables: Mutex<HashMap<String, OriginTable>>,
}

impl OriginStorage {
    pub fn new(quota: QuotaConfig) -> Self {
        Self {
            quota,
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn quota(&self) -> &QuotaConfig {
        &self.quota
    }

    /// Stored value for `(origin, key)`, or `None` if the origin has no table
    /// or the key is absent.
    pub fn get(&self, origin: &str, key: &str) -> Option<String> {
        self.tables
            .lock()
            .get(origin)
            .and_then(|table| table.entries.get(key))
            .cloned()
    }

    /// Write `value` under `(origin, key)`, or delete the key when `value` is
    /// `None`.
    ///
    /// Returns `false` when the write is rejected by the quota; the table is
    /// left untouched in that case. Deletes always succeed.
    pub fn try_put(&self, origin: &str, key: &str, value: Option<String>) -> bool {
        let mut tables = self.tables.lock();

        let Some(value) = value else {
            if let Some(table) = tables.get_mut(origin) {
                table.remove(key);
            }
            return true;
        };

        if let Some(table) = tables.get(origin) {
            if table.reached_limit(&self.quota) && table.additional_bytes(key, &value) > 0 {
                return false;
            }
        }

        tables
            .entry(origin.to_string())
            .or_default()
            .insert(key, value);
        true
    }

    /// Remove `key` from the origin's table. No-op if absent.
    pub fn delete(&self, origin: &str, key: &str) {
        self.try_put(origin, key, None);
    }

    /// Whether the origin's table is at or over its byte or key limit.
    ///
    /// Always `false` when quota checks are disabled.
    pub fn reached_storage_limit(&self, origin: &str) -> bool {
        self.tables
            .lock()
            .get(origin)
            .is_some_and(|table| table.reached_limit(&self.quota))
    }

    /// Key count and byte usage of the origin's table (zero if it has none).
    pub fn usage(&self, origin: &str) -> StorageUsage {
        self.tables
            .lock()
            .get(origin)
            .map(OriginTable::usage)
            .unwrap_or_default()
    }
}

impl Default for OriginStorage {
    fn default() -> Self {
        Self::new(QuotaConfig::default())
    }
}
