use std::sync::Arc;

use propkv_common::{PropResult, PropValue};
use serde_json::Value;
use tracing::trace;

use crate::codec::{to_primitive, JsonCodec, PropCodec};
use crate::escape::{escape, unescape, SegmentIter};
use crate::host::HostStore;
use crate::iter::{EntriesIter, IdsIter, ValuesIter};

pub const DEFAULT_SEPARATOR: char = '_';
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 32767;

/// Engine configuration. Call-site options layer on top of these defaults;
/// independent engines with different configurations never share state.
#[derive(Clone)]
pub struct EngineConfig {
    /// Separator between a logical id and the chunk index in physical keys.
    pub separator: char,
    /// Maximum payload size of one chunk, in bytes.
    pub max_chunk_size: usize,
    /// Namespace applied when a call does not name one. `None` = unscoped.
    pub namespace: Option<String>,
    /// Codec applied when a call does not override it.
    pub codec: Arc<dyn PropCodec + Send + Sync>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            namespace: None,
            codec: Arc::new(JsonCodec),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn max_chunk_size(mut self, max_chunk_size: usize) -> Self {
        self.max_chunk_size = max_chunk_size;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn codec(mut self, codec: Arc<dyn PropCodec + Send + Sync>) -> Self {
        self.codec = codec;
        self
    }
}

/// Per-call options for [PropEngine::get], [PropEngine::values] and
/// [PropEngine::entries].
#[derive(Default, Clone, Copy)]
pub struct GetOptions<'a> {
    pub codec: Option<&'a dyn PropCodec>,
    pub namespace: Option<&'a str>,
}

/// Per-call options for [PropEngine::set].
#[derive(Default, Clone, Copy)]
pub struct SetOptions<'a> {
    pub codec: Option<&'a dyn PropCodec>,
    pub namespace: Option<&'a str>,
}

/// Per-call options for [PropEngine::update]. The codec override is used for
/// both the read and the write.
#[derive(Default, Clone, Copy)]
pub struct UpdateOptions<'a> {
    pub codec: Option<&'a dyn PropCodec>,
    pub namespace: Option<&'a str>,
}

/// Maps logical properties onto runs of physical chunks in a [HostStore].
///
/// A logical property exists iff its chunk at index 0 exists; after every
/// write the chunk run for an id is contiguous (`0..n`). The engine only
/// recognizes keys of the form `<id><separator><digits>`: a bare host key
/// that happens to equal a logical id is invisible to `get`/`exists`/`ids`.
/// Which of the two should win if both exist is undefined upstream and left
/// undefined here.
pub struct PropEngine {
    config: EngineConfig,
}

impl Default for PropEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl PropEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read the logical value for `id`, or `None` if the property does not
    /// exist. Never errors: foreign and damaged payloads decode leniently.
    pub fn get<H: HostStore>(&self, host: &H, id: &str, options: GetOptions) -> Option<Value> {
        let pid = self.resolve_id(id, options.namespace);
        let chunks = self.chunks_of(host, &pid);
        let raw = match chunks.len() {
            0 => return None,
            1 => host.read(&chunks[0].1)?,
            _ => {
                // a value only ever spans chunks when it is a segmented string
                let mut joined = String::new();
                for (_, key) in &chunks {
                    if let Some(PropValue::String(fragment)) = host.read(key) {
                        joined.push_str(&fragment);
                    }
                }
                PropValue::String(joined)
            }
        };
        let raw = match raw {
            PropValue::String(s) => PropValue::String(unescape(&s)),
            other => other,
        };
        Some(self.codec(options.codec).deserialize(raw, &pid))
    }

    /// Write the logical value for `id`. `None` delegates to [Self::delete].
    ///
    /// String payloads are escaped and segmented into chunks of at most
    /// `max_chunk_size` bytes; scalar payloads land in chunk 0. Chunks left
    /// over from a longer previous value are removed, so the run stays
    /// contiguous.
    pub fn set<H: HostStore>(
        &self,
        host: &mut H,
        id: &str,
        value: Option<&Value>,
        options: SetOptions,
    ) -> PropResult<()> {
        let Some(value) = value else {
            self.delete(host, id, options.namespace);
            return Ok(());
        };
        let pid = self.resolve_id(id, options.namespace);
        let serialized = self.codec(options.codec).serialize(value, &pid)?;
        let primitive = to_primitive(serialized, &pid)?;
        let old = self.chunks_of(host, &pid);

        let written = match primitive {
            PropValue::String(s) => {
                let escaped = escape(&s);
                let mut count = 0;
                for segment in SegmentIter::new(&escaped, self.config.max_chunk_size) {
                    let key = self.chunk_key(&pid, count);
                    host.write(&key, Some(PropValue::String(segment.to_string())));
                    count += 1;
                }
                if count == 0 {
                    // an empty string still needs chunk 0 to exist
                    host.write(&self.chunk_key(&pid, 0), Some(PropValue::String(String::new())));
                    count = 1;
                }
                count
            }
            scalar => {
                // also guards against a prior multi-chunk string: everything
                // beyond index 0 is dropped below
                host.write(&self.chunk_key(&pid, 0), Some(scalar));
                1
            }
        };

        let mut stale = 0;
        for (index, key) in &old {
            if *index >= written {
                host.write(key, None);
                stale += 1;
            }
        }
        trace!("set {:?}: {} chunk(s), {} stale removed", pid, written, stale);
        Ok(())
    }

    /// Remove every chunk of `id`.
    pub fn delete<H: HostStore>(&self, host: &mut H, id: &str, namespace: Option<&str>) {
        let pid = self.resolve_id(id, namespace);
        let chunks = self.chunks_of(host, &pid);
        trace!("delete {:?}: {} chunk(s)", pid, chunks.len());
        for (_, key) in chunks {
            host.write(&key, None);
        }
    }

    /// Whether at least one chunk of `id` is present.
    pub fn exists<H: HostStore>(&self, host: &H, id: &str, namespace: Option<&str>) -> bool {
        let pid = self.resolve_id(id, namespace);
        !self.chunks_of(host, &pid).is_empty()
    }

    /// Read-modify-write: applies `updater` to the current value (`None` if
    /// absent), stores and returns the result. Not guarded against external
    /// mutation between the read and the write; host access is assumed
    /// single-threaded.
    pub fn update<H, F>(
        &self,
        host: &mut H,
        id: &str,
        updater: F,
        options: UpdateOptions,
    ) -> PropResult<Value>
    where
        H: HostStore,
        F: FnOnce(Option<Value>) -> Value,
    {
        let current = self.get(
            host,
            id,
            GetOptions {
                codec: options.codec,
                namespace: options.namespace,
            },
        );
        let next = updater(current);
        self.set(
            host,
            id,
            Some(&next),
            SetOptions {
                codec: options.codec,
                namespace: options.namespace,
            },
        )?;
        Ok(next)
    }

    /// Distinct logical ids, lazily derived from the host's key listing in
    /// first-seen order. With a namespace (per-call, else the config
    /// default), only ids under `<namespace>:` are yielded, prefix stripped.
    pub fn ids<H: HostStore>(&self, host: &H, namespace: Option<&str>) -> IdsIter {
        let ns = namespace.or(self.config.namespace.as_deref());
        IdsIter::new(host.keys(), self.config.separator, ns)
    }

    /// Lazily maps [Self::ids] through [Self::get].
    pub fn values<'a, H: HostStore>(&'a self, host: &'a H, options: GetOptions<'a>) -> ValuesIter<'a, H> {
        ValuesIter::new(self.entries(host, options))
    }

    /// Lazily maps [Self::ids] through `(id, get(id))` pairs.
    pub fn entries<'a, H: HostStore>(&'a self, host: &'a H, options: GetOptions<'a>) -> EntriesIter<'a, H> {
        EntriesIter::new(self, host, self.ids(host, options.namespace), options)
    }

    fn codec<'a>(&'a self, overriding: Option<&'a dyn PropCodec>) -> &'a dyn PropCodec {
        match overriding {
            Some(codec) => codec,
            None => self.config.codec.as_ref(),
        }
    }

    fn resolve_id(&self, id: &str, namespace: Option<&str>) -> String {
        match namespace.or(self.config.namespace.as_deref()) {
            Some(ns) => format!("{ns}:{id}"),
            None => id.to_string(),
        }
    }

    fn chunk_key(&self, id: &str, index: usize) -> String {
        format!("{id}{}{index}", self.config.separator)
    }

    /// All chunk keys of `id` present in the host, sorted by parsed integer
    /// index — host listing order is lexicographic at best ("id_10" lists
    /// before "id_2").
    fn chunks_of<H: HostStore>(&self, host: &H, id: &str) -> Vec<(usize, String)> {
        let mut prefix = String::with_capacity(id.len() + self.config.separator.len_utf8());
        prefix.push_str(id);
        prefix.push(self.config.separator);
        let mut chunks: Vec<(usize, String)> = host
            .keys()
            .into_iter()
            .filter_map(|key| {
                let index = parse_chunk_index(key.strip_prefix(&prefix)?)?;
                Some((index, key))
            })
            .collect();
        chunks.sort_unstable_by_key(|&(index, _)| index);
        chunks
    }
}

/// Parse the digits after the separator. Anything that is not a plain
/// non-negative decimal integer marks the key as foreign, never an error.
pub(crate) fn parse_chunk_index(suffix: &str) -> Option<usize> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Split a physical key at its last separator into (logical id, index).
/// Returns `None` for keys the engine does not recognize as chunks.
pub(crate) fn split_chunk_key(key: &str, separator: char) -> Option<(&str, usize)> {
    let pos = key.rfind(separator)?;
    let index = parse_chunk_index(&key[pos + separator.len_utf8()..])?;
    Some((&key[..pos], index))
}
