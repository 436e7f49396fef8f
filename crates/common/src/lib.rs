//! Shared value types used by every arena crate.
//!
//! # Invariants
//! - Types here are plain values: no engine handles are dereferenced, no I/O.

pub mod types;

pub use types::{Aabb, Extents, LightId, MeshHandle, Transform};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
