use glam::Vec2;
use std::collections::HashMap;
use worldgrid_common::GridConfig;

use crate::cell::Cell;
use crate::coord::{CellCoord, compute_cell_coord};
use crate::dispatch::ContainerVisitor;

/// Errors from placing objects on a [`CellMap`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpatialError {
    #[error("position ({x}, {y}) lies outside the map")]
    OutOfBounds { x: f32, y: f32 },
}

/// Per-cell object storage, split by category.
#[derive(Debug, Clone)]
pub struct CellContainer<G, W> {
    grid: Vec<G>,
    world: Vec<W>,
}

impl<G, W> Default for CellContainer<G, W> {
    fn default() -> Self {
        Self {
            grid: Vec::new(),
            world: Vec::new(),
        }
    }
}

impl<G, W> CellContainer<G, W> {
    pub fn grid_objects(&self) -> &[G] {
        &self.grid
    }

    pub fn world_objects(&self) -> &[W] {
        &self.world
    }

    pub fn push_grid(&mut self, object: G) {
        self.grid.push(object);
    }

    pub fn push_world(&mut self, object: W) {
        self.world.push(object);
    }

    /// Keep only the grid objects matching `keep`. Returns how many were dropped.
    pub fn retain_grid(&mut self, keep: impl FnMut(&G) -> bool) -> usize {
        let before = self.grid.len();
        self.grid.retain(keep);
        before - self.grid.len()
    }

    /// Keep only the world objects matching `keep`. Returns how many were dropped.
    pub fn retain_world(&mut self, keep: impl FnMut(&W) -> bool) -> usize {
        let before = self.world.len();
        self.world.retain(keep);
        before - self.world.len()
    }

    pub fn len(&self) -> usize {
        self.grid.len() + self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty() && self.world.is_empty()
    }
}

/// The map capability the range visitor drives.
///
/// Implementations own the object storage; the engine only addresses cells.
/// `visit_cell` takes `&mut self` because a visit may lazily allocate
/// storage for the cell unless the cell carries the no-create flag.
pub trait Map {
    type GridObject;
    type WorldObject;

    fn config(&self) -> &GridConfig;

    /// Hand the container of `cell` to `visitor`, if the cell has one.
    fn visit_cell<C>(&mut self, cell: &Cell, visitor: &mut C)
    where
        C: ContainerVisitor<Self::GridObject, Self::WorldObject> + ?Sized;
}

/// Counters describing how a [`CellMap`] has been visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStats {
    /// `visit_cell` calls.
    pub cells_visited: usize,
    /// Empty cells instantiated by a visit.
    pub cells_created: usize,
    /// Unloaded cells left alone because of the no-create flag.
    pub cells_skipped: usize,
}

/// In-memory map: loaded cells only, keyed by coordinate.
pub struct CellMap<G, W> {
    config: GridConfig,
    cells: HashMap<CellCoord, CellContainer<G, W>>,
    stats: CellStats,
}

impl<G, W> CellMap<G, W> {
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            cells: HashMap::new(),
            stats: CellStats::default(),
        }
    }

    /// Place a grid-resident object in the cell under `position`.
    pub fn insert_grid_object(
        &mut self,
        position: Vec2,
        object: G,
    ) -> Result<CellCoord, SpatialError> {
        let coord = self.coord_in_map(position)?;
        self.cells.entry(coord).or_default().push_grid(object);
        Ok(coord)
    }

    /// Place a world-resident object in the cell under `position`.
    pub fn insert_world_object(
        &mut self,
        position: Vec2,
        object: W,
    ) -> Result<CellCoord, SpatialError> {
        let coord = self.coord_in_map(position)?;
        self.cells.entry(coord).or_default().push_world(object);
        Ok(coord)
    }

    /// Drop grid objects in the cell under `position` for which `matches`
    /// returns true. Returns how many were removed.
    pub fn remove_grid_objects(
        &mut self,
        position: Vec2,
        mut matches: impl FnMut(&G) -> bool,
    ) -> usize {
        let coord = compute_cell_coord(&self.config, position.x, position.y);
        self.cells
            .get_mut(&coord)
            .map_or(0, |c| c.retain_grid(|o| !matches(o)))
    }

    /// Drop world objects in the cell under `position` for which `matches`
    /// returns true. Returns how many were removed.
    pub fn remove_world_objects(
        &mut self,
        position: Vec2,
        mut matches: impl FnMut(&W) -> bool,
    ) -> usize {
        let coord = compute_cell_coord(&self.config, position.x, position.y);
        self.cells
            .get_mut(&coord)
            .map_or(0, |c| c.retain_world(|o| !matches(o)))
    }

    fn coord_in_map(&self, position: Vec2) -> Result<CellCoord, SpatialError> {
        let coord = compute_cell_coord(&self.config, position.x, position.y);
        if !coord.is_valid(&self.config) {
            return Err(SpatialError::OutOfBounds {
                x: position.x,
                y: position.y,
            });
        }
        Ok(coord)
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&CellContainer<G, W>> {
        self.cells.get(&coord)
    }

    pub fn is_loaded(&self, coord: CellCoord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Number of cells with storage, empty or not.
    pub fn loaded_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of objects across all cells.
    pub fn object_count(&self) -> usize {
        self.cells.values().map(CellContainer::len).sum()
    }

    /// Release storage of cells that hold nothing. Returns how many went.
    pub fn unload_empty_cells(&mut self) -> usize {
        let before = self.cells.len();
        self.cells.retain(|_, c| !c.is_empty());
        let unloaded = before - self.cells.len();
        if unloaded > 0 {
            tracing::debug!(unloaded, remaining = self.cells.len(), "unloaded empty cells");
        }
        unloaded
    }

    /// Drop every cell. Visit counters are kept.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn stats(&self) -> CellStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CellStats::default();
    }
}

impl<G, W> Map for CellMap<G, W> {
    type GridObject = G;
    type WorldObject = W;

    fn config(&self) -> &GridConfig {
        &self.config
    }

    fn visit_cell<C>(&mut self, cell: &Cell, visitor: &mut C)
    where
        C: ContainerVisitor<G, W> + ?Sized,
    {
        self.stats.cells_visited += 1;
        let coord = cell.coord();
        if let Some(container) = self.cells.get(&coord) {
            visitor.visit_container(container);
            return;
        }
        if cell.no_create() {
            self.stats.cells_skipped += 1;
            return;
        }
        if !coord.is_valid(&self.config) {
            return;
        }
        tracing::debug!(?coord, "creating cell storage");
        self.stats.cells_created += 1;
        let container = self.cells.entry(coord).or_default();
        visitor.visit_container(container);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{AllObjects, GridFn};

    fn map() -> CellMap<u32, u32> {
        CellMap::new(GridConfig::default())
    }

    #[test]
    fn insert_places_object_in_cell() {
        let mut map = map();
        let coord = map.insert_grid_object(Vec2::new(10.0, 10.0), 7).unwrap();
        assert_eq!(coord, CellCoord::new(256, 256));
        assert_eq!(map.cell(coord).unwrap().grid_objects(), &[7]);
        assert_eq!(map.object_count(), 1);
    }

    #[test]
    fn insert_outside_map_fails() {
        let mut map = map();
        let err = map.insert_world_object(Vec2::new(-1.0e6, 0.0), 1).unwrap_err();
        assert!(matches!(err, SpatialError::OutOfBounds { .. }));
        assert_eq!(map.loaded_cell_count(), 0);
    }

    #[test]
    fn visit_loaded_cell_dispatches() {
        let mut map = map();
        let coord = map.insert_grid_object(Vec2::ZERO, 3).unwrap();
        let mut seen = Vec::new();
        let cell = Cell::new(coord, &GridConfig::default()).with_no_create(true);
        map.visit_cell(&cell, &mut AllObjects(&mut GridFn(|o: &u32| seen.push(*o))));
        assert_eq!(seen, vec![3]);
    }

    #[test]
    fn visit_creates_missing_cell_by_default() {
        let mut map = map();
        let cell = Cell::new(CellCoord::new(5, 5), &GridConfig::default());
        map.visit_cell(&cell, &mut AllObjects(&mut GridFn(|_: &u32| {})));
        assert!(map.is_loaded(CellCoord::new(5, 5)));
        assert_eq!(map.stats().cells_created, 1);
    }

    #[test]
    fn no_create_leaves_missing_cell_alone() {
        let mut map = map();
        let cell = Cell::new(CellCoord::new(5, 5), &GridConfig::default()).with_no_create(true);
        map.visit_cell(&cell, &mut AllObjects(&mut GridFn(|_: &u32| {})));
        assert!(!map.is_loaded(CellCoord::new(5, 5)));
        assert_eq!(
            map.stats(),
            CellStats {
                cells_visited: 1,
                cells_created: 0,
                cells_skipped: 1,
            }
        );
    }

    #[test]
    fn remove_objects_per_category() {
        let mut map = map();
        let pos = Vec2::new(50.0, 50.0);
        map.insert_grid_object(pos, 1).unwrap();
        map.insert_grid_object(pos, 2).unwrap();
        map.insert_world_object(pos, 1).unwrap();

        let removed = map.remove_grid_objects(pos, |o| *o == 1);
        assert_eq!(removed, 1);
        assert_eq!(map.object_count(), 2);

        let removed = map.remove_world_objects(pos, |o| *o == 1);
        assert_eq!(removed, 1);
        assert_eq!(map.object_count(), 1);
    }

    #[test]
    fn unload_empty_cells_keeps_populated_ones() {
        let mut map = map();
        map.insert_grid_object(Vec2::ZERO, 1).unwrap();
        let empty = Cell::new(CellCoord::new(1, 1), &GridConfig::default());
        map.visit_cell(&empty, &mut AllObjects(&mut GridFn(|_: &u32| {})));
        assert_eq!(map.loaded_cell_count(), 2);

        assert_eq!(map.unload_empty_cells(), 1);
        assert_eq!(map.loaded_cell_count(), 1);
    }

    #[test]
    fn reset_stats_zeroes_counters() {
        let mut map = map();
        let cell = Cell::new(CellCoord::new(5, 5), &GridConfig::default());
        map.visit_cell(&cell, &mut AllObjects(&mut GridFn(|_: &u32| {})));
        map.clear();
        assert_eq!(map.stats().cells_created, 1);

        map.reset_stats();
        assert_eq!(map.stats(), CellStats::default());
    }
}
