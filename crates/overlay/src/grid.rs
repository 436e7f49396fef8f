use crate::animator::OverlayError;
use std::time::Duration;

/// Cell geometry for a container of a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundGrid {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

/// One cell's slot in the grid, in pixels from the container's top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub index: usize,
    pub column: u32,
    pub row: u32,
    pub x: u32,
    pub y: u32,
}

impl BackgroundGrid {
    /// Divide `width` x `height` into `columns` x `rows` cells, rounding cell
    /// sizes down.
    pub fn compute(columns: u32, rows: u32, width: u32, height: u32) -> Result<Self, OverlayError> {
        if columns == 0 || rows == 0 {
            return Err(OverlayError::EmptyGrid { columns, rows });
        }
        Ok(Self {
            columns,
            rows,
            cell_width: width / columns,
            cell_height: height / rows,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellPlacement> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.columns).map(move |column| CellPlacement {
                index: row as usize * self.columns as usize + column as usize,
                column,
                row,
                x: column * self.cell_width,
                y: row * self.cell_height,
            })
        })
    }

    /// Grid center in cell units. Falls between cells on even dimensions.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.columns - 1) as f64 / 2.0,
            (self.rows - 1) as f64 / 2.0,
        )
    }

    /// Euclidean distance of a cell from the grid center, in cells.
    pub fn distance_from_center(&self, column: u32, row: u32) -> f64 {
        let (cx, cy) = self.center();
        let dx = column as f64 - cx;
        let dy = row as f64 - cy;
        (dx * dx + dy * dy).sqrt()
    }

    /// Start delay per cell, row-major: `step` per cell of distance from the
    /// center, so the animation ripples outward.
    pub fn stagger_delays(&self, step: Duration) -> Vec<Duration> {
        self.cells()
            .map(|c| step.mul_f64(self.distance_from_center(c.column, c.row)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_sizes_round_down() {
        let grid = BackgroundGrid::compute(20, 50, 1000, 800).unwrap();
        assert_eq!(grid.cell_width, 50);
        assert_eq!(grid.cell_height, 16);
        assert_eq!(grid.cell_count(), 1000);

        let grid = BackgroundGrid::compute(3, 7, 1000, 100).unwrap();
        assert_eq!(grid.cell_width, 333);
        assert_eq!(grid.cell_height, 14);
    }

    #[test]
    fn zero_columns_or_rows_is_an_error() {
        assert!(matches!(
            BackgroundGrid::compute(0, 5, 100, 100),
            Err(OverlayError::EmptyGrid { columns: 0, rows: 5 })
        ));
        assert!(BackgroundGrid::compute(5, 0, 100, 100).is_err());
    }

    #[test]
    fn container_smaller_than_grid_gives_zero_sized_cells() {
        let grid = BackgroundGrid::compute(20, 50, 10, 10).unwrap();
        assert_eq!((grid.cell_width, grid.cell_height), (0, 0));
        assert_eq!(grid.cells().count(), 1000);
    }

    #[test]
    fn cells_are_row_major() {
        let grid = BackgroundGrid::compute(3, 2, 30, 20).unwrap();
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!((cells[1].column, cells[1].row), (1, 0));
        assert_eq!((cells[3].column, cells[3].row), (0, 1));
        assert_eq!((cells[5].x, cells[5].y), (20, 10));
        assert!(cells.iter().enumerate().all(|(i, c)| c.index == i));
    }

    #[test]
    fn stagger_grows_from_center() {
        let grid = BackgroundGrid::compute(3, 3, 30, 30).unwrap();
        let step = Duration::from_millis(100);
        let delays = grid.stagger_delays(step);
        assert_eq!(delays[4], Duration::ZERO);
        assert_eq!(delays[1], step);
        assert!(delays[0] > delays[1]);
        assert_eq!(delays[0], delays[8]);
    }

    #[test]
    fn whole_cell_distances_give_exact_delays() {
        let grid = BackgroundGrid::compute(5, 1, 50, 10).unwrap();
        let delays = grid.stagger_delays(Duration::from_millis(100));
        assert_eq!(
            delays,
            [200, 100, 0, 100, 200].map(Duration::from_millis).to_vec()
        );
    }

    #[test]
    fn even_grid_stagger_is_symmetric() {
        let grid = BackgroundGrid::compute(20, 50, 1000, 800).unwrap();
        let delays = grid.stagger_delays(Duration::from_millis(50));
        let corner = delays[0];
        assert_eq!(corner, delays[delays.len() - 1]);
        let middle = delays[24 * 20 + 9];
        assert!(middle < corner);
        assert!(delays.iter().all(|d| *d >= middle));
    }
}
