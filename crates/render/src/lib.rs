//! Rendering Adapter: hands a generated layout to a renderer-agnostic backend.
//!
//! # Invariants
//! - The backend owns every mesh after hand-off; nothing here keeps the layout.
//! - Configuration errors surface before the first backend call.
//! - Registering a shadow caster twice for the same light is a no-op.
//!
//! `RecordingBackend` is a headless backend that logs every call; swap in an
//! engine-backed implementation of [`SceneBackend`] without changing callers.

mod backend;
mod context;
mod shadow;

pub use backend::{BackendCall, MaterialBinding, RecordingBackend, SceneBackend, Tiling};
pub use context::{EnvironmentContext, PlacedScene, PlacedStructure};
pub use shadow::ShadowRegistry;

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
