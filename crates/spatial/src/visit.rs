//! Range visitor engine.
//!
//! Given the cell an observer stands in and a search radius, decides between
//! a single cell, the full bounding rectangle of cells, or a stepped octagon
//! approximating the search circle, and drives the map over those cells.
//!
//! Callers centering a query on an entity must pass a radius already widened
//! by the entity's combat reach. The `visit_*_objects` entry points do that.
//!
//! # Invariants
//! - An invalid standing cell visits nothing.
//! - A valid standing cell is always visited when anything is.
//! - No cell is visited twice by one call.
//! - Every cell built during a traversal carries the standing cell's
//!   no-create flag.

use glam::Vec2;
use worldgrid_common::{GridConfig, Locatable};

use crate::area::CellArea;
use crate::cell::Cell;
use crate::coord::CellCoord;
use crate::dispatch::{AllObjects, ContainerVisitor, GridObjects, ObjectVisitor, WorldObjects};
use crate::map::Map;

/// Areas wider than this many cells on both axes use the octagon traversal.
pub const OCTAGON_MIN_SPAN: i32 = 4;

/// Which traversal a [`visit`] call took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalKind {
    /// Standing cell outside the map; nothing visited.
    Rejected,
    SingleCell,
    Rectangle,
    Octagon,
}

/// Outcome of one [`visit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisitSummary {
    pub kind: TraversalKind,
    /// Number of `Map::visit_cell` calls made.
    pub cells_visited: usize,
}

impl VisitSummary {
    fn rejected() -> Self {
        Self {
            kind: TraversalKind::Rejected,
            cells_visited: 0,
        }
    }

    fn single() -> Self {
        Self {
            kind: TraversalKind::SingleCell,
            cells_visited: 1,
        }
    }
}

/// True if `area` is large enough that the octagon beats the rectangle.
pub fn uses_octagon(area: &CellArea) -> bool {
    area.high.x > area.low.x + OCTAGON_MIN_SPAN && area.high.y > area.low.y + OCTAGON_MIN_SPAN
}

/// Columns cut from each side of the central strip of the octagon.
///
/// Tuned constants; kept in f32 so the same cells are chosen as on the
/// classic server.
pub fn octagon_shift(area: &CellArea) -> i32 {
    let width = (area.high.x - area.low.x) as f32;
    (width * 0.3 - 0.5).ceil().max(0.0) as i32
}

/// Calls `f` for every cell of the octagon inscribed in `area`.
///
/// First the central strip at full height, then pairs of side columns, one
/// row shorter at both ends per step outwards.
pub fn for_each_octagon_coord(area: &CellArea, mut f: impl FnMut(CellCoord)) {
    let x_shift = octagon_shift(area);
    let x_start = area.low.x + x_shift;
    let x_end = area.high.x - x_shift;

    for x in x_start..=x_end {
        for y in area.low.y..=area.high.y {
            f(CellCoord::new(x, y));
        }
    }

    if x_shift == 0 {
        return;
    }

    for step in 1..=x_shift {
        let y_top = area.high.y - step;
        let y_bottom = area.low.y + step;
        for y in (y_bottom..=y_top).rev() {
            f(CellCoord::new(x_start - step, y));
            f(CellCoord::new(x_end + step, y));
        }
    }
}

/// Cells of the octagon inscribed in `area`, in traversal order.
pub fn octagon_coords(area: &CellArea) -> Vec<CellCoord> {
    let mut coords = Vec::new();
    for_each_octagon_coord(area, |c| coords.push(c));
    coords
}

/// Cells of the full rectangle `area`, in traversal order.
pub fn rectangle_coords(area: &CellArea) -> Vec<CellCoord> {
    area.coords().collect()
}

/// True if the octagon inscribed in `area` covers `coord`.
pub fn octagon_contains(area: &CellArea, coord: CellCoord) -> bool {
    if !area.contains(coord) {
        return false;
    }
    let x_shift = octagon_shift(area);
    let x_start = area.low.x + x_shift;
    let x_end = area.high.x - x_shift;
    let step = if coord.x < x_start {
        x_start - coord.x
    } else if coord.x > x_end {
        coord.x - x_end
    } else {
        0
    };
    coord.y >= area.low.y + step && coord.y <= area.high.y - step
}

/// Visit every cell that may hold something within `radius` of (x, y).
///
/// `standing` must be the cell containing (x, y). Out-of-map standing cells
/// are ignored, non-positive radii visit the standing cell only and radii
/// beyond one zone are clamped to one zone.
pub fn visit<M, C>(
    standing: &Cell,
    visitor: &mut C,
    map: &mut M,
    x: f32,
    y: f32,
    radius: f32,
) -> VisitSummary
where
    M: Map,
    C: ContainerVisitor<M::GridObject, M::WorldObject> + ?Sized,
{
    let config = *map.config();
    if !standing.is_valid(&config) {
        tracing::trace!(coord = ?standing.coord(), "standing cell outside map");
        return VisitSummary::rejected();
    }

    if radius <= 0.0 {
        map.visit_cell(standing, visitor);
        return VisitSummary::single();
    }

    let radius = radius.min(config.max_search_radius());
    let area = CellArea::compute(&config, x, y, radius);
    if area.is_degenerate() {
        map.visit_cell(standing, visitor);
        return VisitSummary::single();
    }

    let summary = if uses_octagon(&area) {
        let bounds = CellArea::bounding(&config, x, y, radius);
        visit_octagon(standing, visitor, map, &config, &bounds)
    } else {
        visit_rectangle(standing, visitor, map, &config, &area)
    };
    tracing::trace!(
        kind = ?summary.kind,
        cells = summary.cells_visited,
        radius,
        "range visit"
    );
    summary
}

fn visit_rectangle<M, C>(
    standing: &Cell,
    visitor: &mut C,
    map: &mut M,
    config: &GridConfig,
    area: &CellArea,
) -> VisitSummary
where
    M: Map,
    C: ContainerVisitor<M::GridObject, M::WorldObject> + ?Sized,
{
    // Standing cell first: small radii care about it most.
    map.visit_cell(standing, visitor);
    let mut cells_visited = 1;

    for coord in area.coords() {
        if coord == standing.coord() {
            continue;
        }
        let cell = Cell::new(coord, config).with_no_create(standing.no_create());
        map.visit_cell(&cell, visitor);
        cells_visited += 1;
    }

    VisitSummary {
        kind: TraversalKind::Rectangle,
        cells_visited,
    }
}

/// `bounds` is the unclipped square around the query point so the octagon
/// keeps its shape at the map border; cells past the border are skipped.
fn visit_octagon<M, C>(
    standing: &Cell,
    visitor: &mut C,
    map: &mut M,
    config: &GridConfig,
    bounds: &CellArea,
) -> VisitSummary
where
    M: Map,
    C: ContainerVisitor<M::GridObject, M::WorldObject> + ?Sized,
{
    // The standing cell sits inside the central strip of its own bounds.
    debug_assert!(octagon_contains(bounds, standing.coord()));

    let no_create = standing.no_create();
    let mut cells_visited = 0;
    for_each_octagon_coord(bounds, |coord| {
        if !coord.is_valid(config) {
            return;
        }
        let cell = Cell::new(coord, config).with_no_create(no_create);
        map.visit_cell(&cell, visitor);
        cells_visited += 1;
    });

    VisitSummary {
        kind: TraversalKind::Octagon,
        cells_visited,
    }
}

fn visit_at<M, C>(
    map: &mut M,
    position: Vec2,
    adapter: &mut C,
    radius: f32,
    dont_load: bool,
) -> VisitSummary
where
    M: Map,
    C: ContainerVisitor<M::GridObject, M::WorldObject>,
{
    let standing = Cell::at(map.config(), position).with_no_create(dont_load);
    visit(&standing, adapter, map, position.x, position.y, radius)
}

/// Visit grid-resident objects around `center`, radius widened by its reach.
pub fn visit_grid_objects<M, V>(
    map: &mut M,
    center: &impl Locatable,
    visitor: &mut V,
    radius: f32,
    dont_load: bool,
) -> VisitSummary
where
    M: Map,
    V: ObjectVisitor<M::GridObject, M::WorldObject>,
{
    let radius = radius + center.combat_reach();
    visit_at(map, center.position(), &mut GridObjects(visitor), radius, dont_load)
}

/// Visit world-resident objects around `center`, radius widened by its reach.
pub fn visit_world_objects<M, V>(
    map: &mut M,
    center: &impl Locatable,
    visitor: &mut V,
    radius: f32,
    dont_load: bool,
) -> VisitSummary
where
    M: Map,
    V: ObjectVisitor<M::GridObject, M::WorldObject>,
{
    let radius = radius + center.combat_reach();
    visit_at(map, center.position(), &mut WorldObjects(visitor), radius, dont_load)
}

/// Visit objects of both categories around `center`, radius widened by its reach.
pub fn visit_all_objects<M, V>(
    map: &mut M,
    center: &impl Locatable,
    visitor: &mut V,
    radius: f32,
    dont_load: bool,
) -> VisitSummary
where
    M: Map,
    V: ObjectVisitor<M::GridObject, M::WorldObject>,
{
    let radius = radius + center.combat_reach();
    visit_at(map, center.position(), &mut AllObjects(visitor), radius, dont_load)
}

/// Visit grid-resident objects around a point.
pub fn visit_grid_objects_at<M, V>(
    map: &mut M,
    position: Vec2,
    visitor: &mut V,
    radius: f32,
    dont_load: bool,
) -> VisitSummary
where
    M: Map,
    V: ObjectVisitor<M::GridObject, M::WorldObject>,
{
    visit_at(map, position, &mut GridObjects(visitor), radius, dont_load)
}

/// Visit world-resident objects around a point.
pub fn visit_world_objects_at<M, V>(
    map: &mut M,
    position: Vec2,
    visitor: &mut V,
    radius: f32,
    dont_load: bool,
) -> VisitSummary
where
    M: Map,
    V: ObjectVisitor<M::GridObject, M::WorldObject>,
{
    visit_at(map, position, &mut WorldObjects(visitor), radius, dont_load)
}

/// Visit objects of both categories around a point.
pub fn visit_all_objects_at<M, V>(
    map: &mut M,
    position: Vec2,
    visitor: &mut V,
    radius: f32,
    dont_load: bool,
) -> VisitSummary
where
    M: Map,
    V: ObjectVisitor<M::GridObject, M::WorldObject>,
{
    visit_at(map, position, &mut AllObjects(visitor), radius, dont_load)
}
