use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use worldgrid_common::{EntityId, Locatable, ObjectCategory};

/// An event record produced by every mutation to the world.
///
/// The spatial index consumes these to relocate objects between cells
/// without a full rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Entity was spawned with the given data.
    Spawned { id: EntityId, data: EntityData },
    /// Entity was despawned. Carries the data it had so the index can find it.
    Despawned { id: EntityId, data: EntityData },
    /// Entity moved on the map plane.
    Moved {
        id: EntityId,
        category: ObjectCategory,
        old: Vec2,
        new: Vec2,
    },
    /// Simulation advanced one tick.
    Stepped { tick: u64 },
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub position: Vec2,
    /// Physical reach, widens every query centered on this entity.
    pub combat_reach: f32,
    pub category: ObjectCategory,
}

impl EntityData {
    pub fn new(position: Vec2, category: ObjectCategory) -> Self {
        Self {
            position,
            combat_reach: 0.0,
            category,
        }
    }

    pub fn with_reach(mut self, combat_reach: f32) -> Self {
        self.combat_reach = combat_reach;
        self
    }
}

impl Locatable for EntityData {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn combat_reach(&self) -> f32 {
        self.combat_reach
    }
}

/// The live world state the spatial index is built from.
///
/// Holds no spatial structure of its own; the index is rebuilt or
/// incrementally updated from the entity table and event log.
#[derive(Debug, Clone, Default)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    tick: u64,
    /// Append-only event log of all mutations.
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Create an empty world at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Read-only access to all entities (BTreeMap for deterministic iteration).
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a new entity. Returns its id.
    pub fn spawn(&mut self, data: EntityData) -> EntityId {
        let id = EntityId::new();
        self.spawn_with_id(id, data);
        id
    }

    /// Spawn an entity with a specific id.
    pub fn spawn_with_id(&mut self, id: EntityId, data: EntityData) {
        self.entities.insert(id, data);
        self.event_log.push(WorldEvent::Spawned { id, data });
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        let data = self.entities.remove(&id);
        if let Some(data) = data {
            self.event_log.push(WorldEvent::Despawned { id, data });
        }
        data
    }

    /// Get a reference to entity data.
    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// Move an entity and log the change. Returns false for unknown ids.
    pub fn set_position(&mut self, id: EntityId, new: Vec2) -> bool {
        let Some(data) = self.entities.get_mut(&id) else {
            return false;
        };
        let old = data.position;
        data.position = new;
        self.event_log.push(WorldEvent::Moved {
            id,
            category: data.category,
            old,
            new,
        });
        true
    }

    /// Advance the simulation by one tick.
    pub fn step(&mut self) {
        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
        tracing::trace!(tick = self.tick, entities = self.entities.len(), "world stepped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_at(x: f32, y: f32) -> EntityData {
        EntityData::new(Vec2::new(x, y), ObjectCategory::Grid)
    }

    #[test]
    fn world_starts_empty() {
        let w = World::new();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.entity_count(), 0);
    }

    #[test]
    fn spawn_and_despawn() {
        let mut w = World::new();
        let id = w.spawn(grid_at(1.0, 2.0));
        assert_eq!(w.entity_count(), 1);
        assert!(w.get(id).is_some());

        let data = w.despawn(id);
        assert_eq!(data.map(|d| d.position), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(w.entity_count(), 0);
        assert!(w.despawn(id).is_none());
    }

    #[test]
    fn step_increments_tick() {
        let mut w = World::new();
        w.step();
        w.step();
        w.step();
        assert_eq!(w.tick(), 3);
    }

    #[test]
    fn events_are_recorded() {
        let mut w = World::new();
        let id = w.spawn(grid_at(0.0, 0.0));
        w.step();
        w.despawn(id);
        assert_eq!(w.events().len(), 3); // spawn + step + despawn
    }

    #[test]
    fn drain_events_clears_log() {
        let mut w = World::new();
        w.spawn(grid_at(0.0, 0.0));
        let events = w.drain_events();
        assert_eq!(events.len(), 1);
        assert!(w.events().is_empty());
    }

    #[test]
    fn set_position_logs_move() {
        let mut w = World::new();
        let id = w.spawn(EntityData::new(Vec2::ZERO, ObjectCategory::World));
        w.drain_events();

        assert!(w.set_position(id, Vec2::new(5.0, -3.0)));
        assert_eq!(w.get(id).unwrap().position, Vec2::new(5.0, -3.0));
        assert_eq!(
            w.events(),
            &[WorldEvent::Moved {
                id,
                category: ObjectCategory::World,
                old: Vec2::ZERO,
                new: Vec2::new(5.0, -3.0),
            }]
        );
    }

    #[test]
    fn set_position_unknown_entity() {
        let mut w = World::new();
        assert!(!w.set_position(EntityId::new(), Vec2::ONE));
        assert!(w.events().is_empty());
    }

    #[test]
    fn entity_data_reports_reach() {
        let data = grid_at(3.0, 4.0).with_reach(1.5);
        assert_eq!(Locatable::position(&data), Vec2::new(3.0, 4.0));
        assert_eq!(Locatable::combat_reach(&data), 1.5);
    }

    #[test]
    fn btreemap_gives_deterministic_iteration() {
        let mut w = World::new();
        for i in 0..50 {
            w.spawn(grid_at(i as f32, 0.0));
        }
        let keys: Vec<EntityId> = w.entities().keys().copied().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
