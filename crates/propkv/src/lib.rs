//! # propkv
//!
//! A chunked property store: arbitrarily large, arbitrarily typed logical
//! values layered on top of a host key-value capability whose entries are
//! size-capped and restricted to a few primitive kinds (bool, number,
//! string, 3-component vector).
//!
//! ## Physical layout
//!
//! A logical property is backed by one or more chunks in the host's flat
//! key space:
//!
//! ```text
//! logical id "ns:profile", value too large for one entry
//!
//!   ns:profile_0   ->  "....first 32767 bytes...."
//!   ns:profile_1   ->  "....next 32767 bytes....."
//!   ns:profile_2   ->  "....tail................."
//! ```
//!
//! Chunk keys are `<logical id><separator><index>` with the index rendered
//! in decimal without padding; after every write the run of indices is
//! contiguous starting at 0, and chunk 0 exists iff the property exists.
//! Reassembly sorts by parsed integer index — the host's listing order is
//! never trusted ("id_10" lists before "id_2" lexicographically).
//!
//! String payloads are stored percent-escaped so that chunk windows, which
//! are measured in bytes, can never split a multi-byte character; the
//! transform is reversed after full reassembly on read. Scalar payloads
//! always occupy chunk 0 alone.
//!
//! Host keys that do not parse as `<id><separator><digits>` are foreign
//! data: invisible to lookups and enumeration, never an error. A write
//! interrupted between chunks can leave a stale or incomplete run; the
//! engine keeps no checksum or completion marker and does not detect this.

pub mod codec;
pub mod engine;
mod escape;
pub mod host;
pub mod iter;

pub use codec::{JsonCodec, PropCodec};
pub use engine::{
    EngineConfig, GetOptions, PropEngine, SetOptions, UpdateOptions, DEFAULT_MAX_CHUNK_SIZE,
    DEFAULT_SEPARATOR,
};
pub use host::{HostStore, MemHostStore};
pub use iter::{EntriesIter, IdsIter, ValuesIter};
pub use propkv_common::{PropError, PropResult, PropValue, Vector3};
