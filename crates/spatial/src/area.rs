use worldgrid_common::GridConfig;

use crate::coord::{CellCoord, compute_cell_coord};

/// Axis-aligned block of cells bounding a circular query region.
///
/// Both bounds are inclusive and `low <= high` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellArea {
    pub low: CellCoord,
    pub high: CellCoord,
}

impl CellArea {
    pub fn new(low: CellCoord, high: CellCoord) -> Self {
        debug_assert!(low.x <= high.x && low.y <= high.y, "inverted cell area");
        Self { low, high }
    }

    /// Area made of a single cell.
    pub fn single(coord: CellCoord) -> Self {
        Self::new(coord, coord)
    }

    /// Cells that may hold anything within `radius` of (x, y).
    ///
    /// A non-positive radius collapses to the normalized cell under the point.
    pub fn compute(config: &GridConfig, x: f32, y: f32, radius: f32) -> Self {
        if radius <= 0.0 {
            return Self::single(compute_cell_coord(config, x, y).normalize(config));
        }
        let low = compute_cell_coord(config, x - radius, y - radius).normalize(config);
        let high = compute_cell_coord(config, x + radius, y + radius).normalize(config);
        Self::new(low, high)
    }

    /// Bounding square of the search circle, not clipped to the map.
    ///
    /// Coordinates past the map border are kept so that shapes built from it
    /// stay centered on (x, y). Callers filter with [`CellCoord::is_valid`].
    pub fn bounding(config: &GridConfig, x: f32, y: f32, radius: f32) -> Self {
        let radius = radius.max(0.0);
        let low = compute_cell_coord(config, x - radius, y - radius);
        let high = compute_cell_coord(config, x + radius, y + radius);
        Self::new(low, high)
    }

    /// True when the area is a single cell.
    pub fn is_degenerate(&self) -> bool {
        self.low == self.high
    }

    /// Span along x, in cells, not counting the low column.
    pub fn width(&self) -> u32 {
        (self.high.x - self.low.x) as u32
    }

    /// Span along y, in cells, not counting the low row.
    pub fn height(&self) -> u32 {
        (self.high.y - self.low.y) as u32
    }

    pub fn cell_count(&self) -> usize {
        (self.width() as usize + 1) * (self.height() as usize + 1)
    }

    pub fn contains(&self, coord: CellCoord) -> bool {
        (self.low.x..=self.high.x).contains(&coord.x)
            && (self.low.y..=self.high.y).contains(&coord.y)
    }

    /// Every coordinate in the area, column by column.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let (low, high) = (self.low, self.high);
        (low.x..=high.x).flat_map(move |x| (low.y..=high.y).map(move |y| CellCoord::new(x, y)))
    }
}

/// Free-function form of [`CellArea::compute`].
pub fn compute_area(config: &GridConfig, x: f32, y: f32, radius: f32) -> CellArea {
    CellArea::compute(config, x, y, radius)
}
