use glam::Vec2;
use std::hash::{Hash, Hasher};
use worldgrid_common::GridConfig;

use crate::coord::{CellCoord, ZoneCoord, compute_cell_coord};

/// Handle to one cell of the map, built on demand for a single query.
///
/// Splits the cell coordinate into its zone and the position inside that
/// zone. The no-create flag tells the map not to allocate storage for the
/// cell if nothing was ever placed there. Equality and hashing look at the
/// coordinate only.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    coord: CellCoord,
    zone: ZoneCoord,
    cell_x: u32,
    cell_y: u32,
    no_create: bool,
}

impl Cell {
    pub fn new(coord: CellCoord, config: &GridConfig) -> Self {
        let per_zone = config.cells_per_zone.clamp(1, i32::MAX as u32) as i32;
        Self {
            coord,
            zone: ZoneCoord::new(coord.x.div_euclid(per_zone), coord.y.div_euclid(per_zone)),
            cell_x: coord.x.rem_euclid(per_zone) as u32,
            cell_y: coord.y.rem_euclid(per_zone) as u32,
            no_create: false,
        }
    }

    /// Cell containing a world position.
    pub fn at(config: &GridConfig, position: Vec2) -> Self {
        Self::new(compute_cell_coord(config, position.x, position.y), config)
    }

    pub fn with_no_create(mut self, no_create: bool) -> Self {
        self.no_create = no_create;
        self
    }

    pub fn no_create(&self) -> bool {
        self.no_create
    }

    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    pub fn zone(&self) -> ZoneCoord {
        self.zone
    }

    pub fn zone_x(&self) -> i32 {
        self.zone.x
    }

    pub fn zone_y(&self) -> i32 {
        self.zone.y
    }

    /// Column inside the zone.
    pub fn cell_x(&self) -> u32 {
        self.cell_x
    }

    /// Row inside the zone.
    pub fn cell_y(&self) -> u32 {
        self.cell_y
    }

    pub fn is_valid(&self, config: &GridConfig) -> bool {
        self.coord.is_valid(config)
    }

    /// True if the intra-zone position differs, whatever the zones.
    pub fn diff_cell(&self, other: &Cell) -> bool {
        self.cell_x != other.cell_x || self.cell_y != other.cell_y
    }

    /// True if the two cells belong to different zones.
    pub fn diff_zone(&self, other: &Cell) -> bool {
        self.zone != other.zone
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}
