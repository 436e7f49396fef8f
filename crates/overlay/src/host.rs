use crate::grid::CellPlacement;
use std::time::Duration;

/// Handle to a running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(pub u64);

/// Animation over every cell of the container.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSpec {
    /// One delay per cell, row-major.
    pub delays: Vec<Duration>,
    pub duration: Duration,
    pub looping: bool,
    pub alternate: bool,
}

/// The container the overlay draws into.
pub trait OverlayHost {
    fn clear_cells(&mut self);

    fn append_cell(&mut self, cell: CellPlacement, width: u32, height: u32);

    fn cell_count(&self) -> usize;

    fn start_animation(&mut self, spec: AnimationSpec) -> AnimationId;

    fn cancel_animation(&mut self, id: AnimationId);
}

/// Headless container.
#[derive(Debug, Default)]
pub struct InMemoryOverlay {
    cells: Vec<(CellPlacement, u32, u32)>,
    running: Vec<(AnimationId, AnimationSpec)>,
    next_id: u64,
    started: usize,
    cancelled: usize,
}

impl InMemoryOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells with their width and height.
    pub fn cells(&self) -> &[(CellPlacement, u32, u32)] {
        &self.cells
    }

    pub fn running(&self) -> &[(AnimationId, AnimationSpec)] {
        &self.running
    }

    pub fn started(&self) -> usize {
        self.started
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }
}

impl OverlayHost for InMemoryOverlay {
    fn clear_cells(&mut self) {
        self.cells.clear();
    }

    fn append_cell(&mut self, cell: CellPlacement, width: u32, height: u32) {
        self.cells.push((cell, width, height));
    }

    fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn start_animation(&mut self, spec: AnimationSpec) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.started += 1;
        self.running.push((id, spec));
        id
    }

    fn cancel_animation(&mut self, id: AnimationId) {
        let before = self.running.len();
        self.running.retain(|(running, _)| *running != id);
        self.cancelled += before - self.running.len();
    }
}
