use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::engine::{split_chunk_key, GetOptions, PropEngine};
use crate::host::HostStore;

/// Distinct logical ids derived from a snapshot of the host's key listing.
///
/// Each call to `ids()` produces a fresh iterator; the sequence is not safe
/// to interleave with mutation of the host's key set. Order is the host's
/// listing order collapsed to first sighting, not sorted. Keys without a
/// parsable chunk index are skipped silently.
pub struct IdsIter {
    keys: std::vec::IntoIter<String>,
    seen: FxHashSet<String>,
    /// `"<namespace>:"` when a namespace filter is active.
    prefix: Option<String>,
    separator: char,
}

impl IdsIter {
    pub(crate) fn new(keys: Vec<String>, separator: char, namespace: Option<&str>) -> Self {
        Self {
            keys: keys.into_iter(),
            seen: FxHashSet::default(),
            prefix: namespace.map(|ns| format!("{ns}:")),
            separator,
        }
    }
}

impl Iterator for IdsIter {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let key = self.keys.next()?;
            let Some((id, _)) = split_chunk_key(&key, self.separator) else {
                continue;
            };
            let logical = match &self.prefix {
                Some(prefix) => match id.strip_prefix(prefix.as_str()) {
                    Some(rest) => rest,
                    None => continue,
                },
                None => id,
            };
            if !self.seen.contains(logical) {
                let owned = logical.to_string();
                self.seen.insert(owned.clone());
                return Some(owned);
            }
        }
    }
}

/// Lazily maps [IdsIter] through `(id, get(id))` pairs.
pub struct EntriesIter<'a, H: HostStore> {
    engine: &'a PropEngine,
    host: &'a H,
    ids: IdsIter,
    options: GetOptions<'a>,
}

impl<'a, H: HostStore> EntriesIter<'a, H> {
    pub(crate) fn new(
        engine: &'a PropEngine,
        host: &'a H,
        ids: IdsIter,
        options: GetOptions<'a>,
    ) -> Self {
        Self {
            engine,
            host,
            ids,
            options,
        }
    }
}

impl<H: HostStore> Iterator for EntriesIter<'_, H> {
    type Item = (String, Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.ids.next()?;
            // an id was derived from a present chunk, so get normally
            // succeeds; skip if the chunk vanished since the listing
            if let Some(value) = self.engine.get(self.host, &id, self.options) {
                return Some((id, value));
            }
        }
    }
}

/// Lazily maps [IdsIter] through [PropEngine::get].
pub struct ValuesIter<'a, H: HostStore> {
    inner: EntriesIter<'a, H>,
}

impl<'a, H: HostStore> ValuesIter<'a, H> {
    pub(crate) fn new(inner: EntriesIter<'a, H>) -> Self {
        Self { inner }
    }
}

impl<H: HostStore> Iterator for ValuesIter<'_, H> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.next().map(|(_, value)| value)
    }
}
