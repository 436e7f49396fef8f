//! Background overlay: a grid of cells sized to the container, animated with
//! a looping, alternating stagger that ripples out from the grid center.
//!
//! # Invariants
//! - After any rebuild the host holds exactly `columns x rows` cells.
//! - At most one animation runs at a time; the previous one is cancelled
//!   before the cells it targets are removed.
//! - Rebuilds never interleave. Resize notifications coalesce to the latest
//!   size and are applied by [`BackgroundAnimator::flush`].

mod animator;
mod grid;
mod host;

pub use animator::{BackgroundAnimator, OverlayConfig, OverlayError};
pub use grid::{BackgroundGrid, CellPlacement};
pub use host::{AnimationId, AnimationSpec, InMemoryOverlay, OverlayHost};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
