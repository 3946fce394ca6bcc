use glam::Vec2;
use worldgrid_common::{EntityId, ObjectCategory};
use worldgrid_kernel::{World, WorldEvent};

use crate::coord::compute_cell_coord;
use crate::map::{CellMap, Map, SpatialError};

/// Cell map over the entities of a kernel [`World`], both categories keyed by id.
pub type EntityMap = CellMap<EntityId, EntityId>;

impl EntityMap {
    /// Rebuild the whole index from the current world state.
    ///
    /// Entities standing outside the map are left out and visit counters start
    /// from zero. Returns how many were placed.
    pub fn rebuild(&mut self, world: &World) -> usize {
        let _span = tracing::info_span!("cell_map_rebuild").entered();
        self.clear();
        self.reset_stats();
        let mut placed = 0;
        for (id, data) in world.entities() {
            match self.place(*id, data.category, data.position) {
                Ok(()) => placed += 1,
                Err(e) => tracing::debug!(?id, %e, "entity not indexed"),
            }
        }
        tracing::debug!(placed, cells = self.loaded_cell_count(), "cell map rebuilt");
        placed
    }

    /// Apply world mutations incrementally, relocating entities between cells.
    pub fn apply_events(&mut self, events: &[WorldEvent]) {
        for event in events {
            match event {
                WorldEvent::Spawned { id, data } => {
                    if let Err(e) = self.place(*id, data.category, data.position) {
                        tracing::debug!(?id, %e, "spawned entity not indexed");
                    }
                }
                WorldEvent::Despawned { id, data } => {
                    self.unplace(*id, data.category, data.position);
                }
                WorldEvent::Moved {
                    id,
                    category,
                    old,
                    new,
                } => {
                    let config = *self.config();
                    let from = compute_cell_coord(&config, old.x, old.y);
                    if from == compute_cell_coord(&config, new.x, new.y) {
                        continue;
                    }
                    self.unplace(*id, *category, *old);
                    if let Err(e) = self.place(*id, *category, *new) {
                        tracing::debug!(?id, %e, "moved entity left the map");
                    }
                }
                WorldEvent::Stepped { .. } => {}
            }
        }
    }

    fn place(
        &mut self,
        id: EntityId,
        category: ObjectCategory,
        position: Vec2,
    ) -> Result<(), SpatialError> {
        match category {
            ObjectCategory::Grid => self.insert_grid_object(position, id)?,
            ObjectCategory::World => self.insert_world_object(position, id)?,
        };
        Ok(())
    }

    fn unplace(&mut self, id: EntityId, category: ObjectCategory, position: Vec2) -> usize {
        match category {
            ObjectCategory::Grid => self.remove_grid_objects(position, |o| *o == id),
            ObjectCategory::World => self.remove_world_objects(position, |o| *o == id),
        }
    }
}
