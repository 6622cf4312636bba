use std::collections::BTreeMap;

use propkv_common::PropValue;

/// The flat key-value capability the engine builds upon.
///
/// Entries are size-capped and restricted to the [PropValue] kinds; the host
/// has no notion of chunks or namespaces. Writing `None` deletes the entry.
/// Key listing order is unspecified.
pub trait HostStore {
    fn read(&self, key: &str) -> Option<PropValue>;
    fn write(&mut self, key: &str, value: Option<PropValue>);
    fn keys(&self) -> Vec<String>;
    fn total_byte_count(&self) -> usize;
    fn clear(&mut self);
}

/// In-memory [HostStore], the reference host used in tests.
///
/// Backed by a `BTreeMap`, so `keys()` happens to come back in lexicographic
/// order ("id_10" before "id_2") — which is exactly the order the engine must
/// not rely on.
#[derive(Debug, Clone)]
pub struct MemHostStore {
    entries: BTreeMap<String, PropValue>,
    max_value_size: usize,
}

pub const DEFAULT_MAX_VALUE_SIZE: usize = 32767;

impl MemHostStore {
    pub fn new() -> Self {
        Self::with_max_value_size(DEFAULT_MAX_VALUE_SIZE)
    }

    pub fn with_max_value_size(max_value_size: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            max_value_size,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemHostStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HostStore for MemHostStore {
    fn read(&self, key: &str) -> Option<PropValue> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: Option<PropValue>) {
        match value {
            Some(v) => {
                debug_assert!(
                    v.byte_size() <= self.max_value_size,
                    "host entry {:?} exceeds the per-entry cap ({} > {})",
                    key,
                    v.byte_size(),
                    self.max_value_size
                );
                self.entries.insert(key.to_string(), v);
            }
            None => {
                self.entries.remove(key);
            }
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn total_byte_count(&self) -> usize {
        self.entries
            .iter()
            .fold(0, |acc, (k, v)| acc + k.len() + v.byte_size())
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}
