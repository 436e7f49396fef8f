use crate::grid::BackgroundGrid;
use crate::host::{AnimationId, AnimationSpec, OverlayHost};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    #[error("overlay container is missing")]
    MissingContainer,
    #[error("grid must have at least one column and row (got {columns} x {rows})")]
    EmptyGrid { columns: u32, rows: u32 },
}

/// Grid shape and animation timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    pub columns: u32,
    pub rows: u32,
    /// Length of one animation pass, in milliseconds.
    pub duration_ms: u64,
    /// Extra start delay per cell of distance from the center, in milliseconds.
    pub stagger_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 50,
            duration_ms: 1500,
            stagger_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ContainerSize {
    width: u32,
    height: u32,
}

/// Owns the overlay's cells and its single running animation.
///
/// Without a host container every operation is a no-op; the first attempt
/// logs a warning.
#[derive(Debug)]
pub struct BackgroundAnimator<H: OverlayHost> {
    host: Option<H>,
    config: OverlayConfig,
    grid: Option<BackgroundGrid>,
    running: Option<AnimationId>,
    size: Option<ContainerSize>,
    pending: Option<ContainerSize>,
    missing_reported: bool,
}

impl<H: OverlayHost> BackgroundAnimator<H> {
    pub fn new(host: Option<H>, config: OverlayConfig) -> Self {
        Self {
            host,
            config,
            grid: None,
            running: None,
            size: None,
            pending: None,
            missing_reported: false,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    /// Grid of the last successful rebuild.
    pub fn grid(&self) -> Option<BackgroundGrid> {
        self.grid
    }

    pub fn running(&self) -> Option<AnimationId> {
        self.running
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Tear down every cell and build a fresh `columns` x `rows` grid for a
    /// `width` x `height` container, then start one animation over it.
    ///
    /// The previous animation is cancelled before its cells are removed. An
    /// empty grid is rejected before anything is torn down.
    pub fn rebuild(
        &mut self,
        columns: u32,
        rows: u32,
        width: u32,
        height: u32,
    ) -> Result<BackgroundGrid, OverlayError> {
        let grid = BackgroundGrid::compute(columns, rows, width, height)?;
        if self.host.is_none() && !self.missing_reported {
            self.missing_reported = true;
            tracing::warn!("background overlay container missing; overlay disabled");
        }
        let Some(host) = self.host.as_mut() else {
            return Err(OverlayError::MissingContainer);
        };
        let _span = tracing::info_span!("overlay_rebuild", columns, rows, width, height).entered();

        if let Some(id) = self.running.take() {
            host.cancel_animation(id);
        }
        host.clear_cells();

        for cell in grid.cells() {
            host.append_cell(cell, grid.cell_width, grid.cell_height);
        }

        let spec = AnimationSpec {
            delays: grid.stagger_delays(Duration::from_millis(self.config.stagger_ms)),
            duration: Duration::from_millis(self.config.duration_ms),
            looping: true,
            alternate: true,
        };
        self.running = Some(host.start_animation(spec));
        self.grid = Some(grid);
        self.size = Some(ContainerSize { width, height });

        tracing::debug!(
            cells = host.cell_count(),
            cell_width = grid.cell_width,
            cell_height = grid.cell_height,
            "overlay rebuilt"
        );
        Ok(grid)
    }

    /// Note a container resize. Only the latest size is kept; nothing is
    /// rebuilt until [`flush`](Self::flush).
    pub fn request_rebuild(&mut self, width: u32, height: u32) {
        if self.pending.is_some() {
            tracing::trace!(width, height, "coalescing overlay rebuild");
        }
        self.pending = Some(ContainerSize { width, height });
    }

    /// Explicit refresh: rebuild at the last known size.
    pub fn refresh(&mut self) {
        if let Some(size) = self.pending.or(self.size) {
            self.pending = Some(size);
        }
    }

    /// Apply the pending rebuild, if any, with the configured grid shape.
    /// Returns `Ok(None)` when nothing was pending.
    pub fn flush(&mut self) -> Result<Option<BackgroundGrid>, OverlayError> {
        let Some(size) = self.pending.take() else {
            return Ok(None);
        };
        let (columns, rows) = (self.config.columns, self.config.rows);
        self.rebuild(columns, rows, size.width, size.height).map(Some)
    }
}
