//! Shared types for the propkv workspace: the closed set of host-storable
//! primitive values and the error taxonomy.

mod error;
mod value;

pub use error::{PropError, PropResult};
pub use value::{PropValue, Vector3};
