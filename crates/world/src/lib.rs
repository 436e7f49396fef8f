//! Procedural environment: a ground plane, four perimeter walls and a random
//! scatter of buildings, all driven by a [`GeometryConfig`].
//!
//! # Invariants
//! - Configuration is validated before any structure is produced; generation
//!   never returns a partial environment.
//! - Output order is ground, walls (+X, -X, +Z, -Z), buildings.
//! - Given the same unit sequence, output is bit-for-bit reproducible.
//! - Buildings are placed independently; overlaps with each other or with the
//!   walls are accepted.

pub mod config;
pub mod generator;
pub mod layout;
pub mod sampler;
pub mod structure;

pub use config::{
    ConfigError, CountRange, GeometryConfig, MaterialMode, MaterialVariant, ShadowPolicy,
    SizeRange,
};
pub use generator::{building, generate, ground, walls};
pub use layout::Layout;
pub use sampler::{
    FnSource, LayoutSampler, PlacementSample, SeededSource, SequenceSource, ThreadSource,
    UnitSource,
};
pub use structure::{MaterialRef, ShadowRole, Structure, StructureKind, WallSide};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
