use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which per-cell container an object lives in.
///
/// Grid-resident objects (creatures, game objects, dynamic objects) are owned
/// by the cell they stand in. World-resident objects (players, corpses,
/// far-sight carriers) are tracked by the cell too but keep the grid loaded
/// around them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectCategory {
    #[default]
    Grid,
    World,
}

/// Anything with a planar position that can center a range query.
pub trait Locatable {
    /// Position on the map plane in world units.
    fn position(&self) -> Vec2;

    /// Physical reach added to every query radius centered on this object,
    /// so that large bodies are found by searches aimed at their edge.
    fn combat_reach(&self) -> f32 {
        0.0
    }
}

impl Locatable for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn category_defaults_to_grid() {
        assert_eq!(ObjectCategory::default(), ObjectCategory::Grid);
    }

    #[test]
    fn points_have_no_reach() {
        let p = Vec2::new(3.0, -4.0);
        assert_eq!(p.position(), p);
        assert_eq!(p.combat_reach(), 0.0);
    }
}
