//! World position to grid coordinate mapping.

use worldgrid_common::GridConfig;

/// A cell coordinate on the map grid.
///
/// Signed so that positions outside the map produce a coordinate that
/// `is_valid` rejects instead of wrapping onto the far side of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True iff both components lie in `[0, total_cells_per_axis)`.
    pub fn is_valid(&self, config: &GridConfig) -> bool {
        let limit = config.total_cells_per_axis() as i64;
        (0..limit).contains(&(self.x as i64)) && (0..limit).contains(&(self.y as i64))
    }

    /// Clamp both components into the map.
    pub fn normalize(self, config: &GridConfig) -> Self {
        let max = config.total_cells_per_axis().saturating_sub(1).min(i32::MAX as u32) as i32;
        Self {
            x: self.x.clamp(0, max),
            y: self.y.clamp(0, max),
        }
    }

    /// Dense row-major index of the cell, `None` outside the map.
    pub fn id(&self, config: &GridConfig) -> Option<u32> {
        if !self.is_valid(config) {
            return None;
        }
        Some(self.y as u32 * config.total_cells_per_axis() + self.x as u32)
    }

    /// Step `n` cells towards +x, stopping at the map border.
    pub fn inc_x(self, n: u32, config: &GridConfig) -> Self {
        Self {
            x: step_up(self.x, n, config),
            ..self
        }
    }

    /// Step `n` cells towards -x, stopping at the map border.
    pub fn dec_x(self, n: u32) -> Self {
        Self {
            x: step_down(self.x, n),
            ..self
        }
    }

    /// Step `n` cells towards +y, stopping at the map border.
    pub fn inc_y(self, n: u32, config: &GridConfig) -> Self {
        Self {
            y: step_up(self.y, n, config),
            ..self
        }
    }

    /// Step `n` cells towards -y, stopping at the map border.
    pub fn dec_y(self, n: u32) -> Self {
        Self {
            y: step_down(self.y, n),
            ..self
        }
    }
}

fn step_up(v: i32, n: u32, config: &GridConfig) -> i32 {
    let max = config.total_cells_per_axis() as i64 - 1;
    (v as i64 + n as i64).min(max) as i32
}

fn step_down(v: i32, n: u32) -> i32 {
    (v as i64 - n as i64).max(0) as i32
}

/// A zone coordinate: a square block of `cells_per_zone` cells per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneCoord {
    pub x: i32,
    pub y: i32,
}

impl ZoneCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_valid(&self, config: &GridConfig) -> bool {
        let limit = config.zones_per_axis as i64;
        (0..limit).contains(&(self.x as i64)) && (0..limit).contains(&(self.y as i64))
    }
}

/// Index along one axis, computed in f64 and saturating at the i32 range.
fn axis_index(v: f32, size: f32, origin: i32) -> i32 {
    ((v as f64 / size as f64).floor() + origin as f64) as i32
}

/// Cell containing world position (x, y). Not normalized.
pub fn compute_cell_coord(config: &GridConfig, x: f32, y: f32) -> CellCoord {
    CellCoord {
        x: axis_index(x, config.cell_size, config.origin_cell()),
        y: axis_index(y, config.cell_size, config.origin_cell()),
    }
}

/// Zone containing world position (x, y). Not normalized.
pub fn compute_zone_coord(config: &GridConfig, x: f32, y: f32) -> ZoneCoord {
    ZoneCoord {
        x: axis_index(x, config.zone_size(), config.origin_zone()),
        y: axis_index(y, config.zone_size(), config.origin_zone()),
    }
}

/// Clamp a world coordinate half a unit inside the map border.
pub fn normalize_map_coord(config: &GridConfig, v: f32) -> f32 {
    v.max(config.world_min() + 0.5).min(config.world_max() - 0.5)
}

/// True iff (x, y) is finite and at least half a unit inside the map border.
pub fn is_valid_map_coord(config: &GridConfig, x: f32, y: f32) -> bool {
    let lo = config.world_min() + 0.5;
    let hi = config.world_max() - 0.5;
    x.is_finite() && y.is_finite() && (lo..=hi).contains(&x) && (lo..=hi).contains(&y)
}
