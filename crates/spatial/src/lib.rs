//! Spatial index: cell grid addressing and range visitation.
//!
//! Turns "everything within R of this entity" into a bounded walk over the
//! map's cells. The engine owns no object storage; it addresses cells and
//! lets a [`Map`] hand each cell's container to a category-filtered visitor.
//!
//! # Invariants
//! - Queries never fail: out-of-map centers find nothing, non-positive radii
//!   look at one cell, oversized radii are clamped to one zone.
//! - All traversal state is stack-local. Concurrent mutation of a map during
//!   a visit is prevented by `Map::visit_cell` taking `&mut self`.

mod area;
mod cell;
mod coord;
mod dispatch;
mod entities;
mod map;
mod visit;

pub use area::{CellArea, compute_area};
pub use cell::Cell;
pub use coord::{
    CellCoord, ZoneCoord, compute_cell_coord, compute_zone_coord, is_valid_map_coord,
    normalize_map_coord,
};
pub use dispatch::{
    AllObjects, ContainerVisitor, GridFn, GridObjects, ObjectVisitor, WorldFn, WorldObjects,
};
pub use entities::EntityMap;
pub use map::{CellContainer, CellMap, CellStats, Map, SpatialError};
pub use visit::{
    OCTAGON_MIN_SPAN, TraversalKind, VisitSummary, for_each_octagon_coord, octagon_contains,
    octagon_coords, octagon_shift, rectangle_coords, uses_octagon, visit, visit_all_objects,
    visit_all_objects_at, visit_grid_objects, visit_grid_objects_at, visit_world_objects,
    visit_world_objects_at,
};
