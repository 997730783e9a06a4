//! Host-side world interface
//!
//! The engine never talks to the simulation directly; every world-touching
//! builtin forwards through the [`World`] trait. The physics/entity
//! simulation and the persistent storage table live behind this seam and are
//! not part of the engine.
//!
//! [`MockWorld`] is a recording double for tests and the CLI runner: it
//! remembers every emission, force, hp change and hack, serves entity
//! positions and scripted ray hits from fixtures, and owns the 256-slot
//! storage table. Storage deliberately survives across runs against the same
//! world instance; it is the one piece of cross-run shared state.

use rustc_hash::FxHashMap;

use crate::interpreter::constants::STORAGE_SLOTS;

/// Outcome of a raycast that hit something
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entity id that was hit; 0 means static geometry (a wall)
    pub entity: f64,
    /// Surface normal at the hit point
    pub normal: [f64; 3],
}

/// External collaborators backing the builtin surface.
///
/// Implementations translate engine requests into simulation effects and
/// answers. Effects applied before a script terminates are not rolled back;
/// the engine offers no transactional guarantees over this boundary.
pub trait World {
    /// Entity id of the script's own bot
    fn self_id(&self) -> f64;

    /// Position of an entity, or `None` if it does not exist
    fn position(&mut self, entity: f64) -> Option<[f64; 3]>;

    /// Ids of entities within `radius` of `entity`
    fn nearby(&mut self, entity: f64, radius: f64) -> Vec<f64>;

    /// Apply a force to an entity. The engine clamps the magnitude before
    /// calling this.
    fn apply_force(&mut self, entity: f64, force: [f64; 3]);

    /// Set an entity's hit points
    fn set_hp(&mut self, entity: f64, hp: f64);

    /// Cast a ray; `None` on miss
    fn raycast(&mut self, origin: [f64; 3], direction: [f64; 3]) -> Option<RayHit>;

    /// Tamper with a named property of an entity
    fn hack(&mut self, entity: f64, property: &str, value: f64);

    /// Receive a `print` value
    fn emit(&mut self, value: f64);

    /// Write a persistent storage slot (0..255; callers bounds-check)
    fn store(&mut self, slot: usize, value: f64);

    /// Read a persistent storage slot
    fn load(&mut self, slot: usize) -> f64;
}

/// A recorded `hack` call
#[derive(Debug, Clone, PartialEq)]
pub struct HackRecord {
    pub entity: f64,
    pub property: String,
    pub value: f64,
}

/// Recording world double for tests and the CLI runner
#[derive(Debug, Default)]
pub struct MockWorld {
    /// Entity id reported by `self()`
    pub own_id: f64,
    /// Entity positions served by `pos`/`near`
    pub positions: FxHashMap<u64, [f64; 3]>,
    /// Fixed answer for every raycast; `None` means every ray misses
    pub ray_hit: Option<RayHit>,

    /// Every value `print` emitted, in order
    pub emitted: Vec<f64>,
    /// Every force that reached the world, post-clamp
    pub forces: Vec<(f64, [f64; 3])>,
    /// Every hp change
    pub hp_changes: Vec<(f64, f64)>,
    /// Every hack
    pub hacks: Vec<HackRecord>,

    storage: Vec<f64>,
}

impl MockWorld {
    pub fn new(own_id: f64) -> Self {
        MockWorld {
            own_id,
            storage: vec![0.0; STORAGE_SLOTS],
            ..Default::default()
        }
    }

    /// Place an entity at a position fixture
    pub fn place(&mut self, entity: u64, position: [f64; 3]) {
        self.positions.insert(entity, position);
    }
}

impl World for MockWorld {
    fn self_id(&self) -> f64 {
        self.own_id
    }

    fn position(&mut self, entity: f64) -> Option<[f64; 3]> {
        if entity < 0.0 || entity.fract() != 0.0 {
            return None;
        }
        self.positions.get(&(entity as u64)).copied()
    }

    fn nearby(&mut self, entity: f64, radius: f64) -> Vec<f64> {
        let Some(center) = self.position(entity) else {
            return Vec::new();
        };

        let mut ids: Vec<u64> = self
            .positions
            .iter()
            .filter(|&(&id, pos)| {
                id as f64 != entity && {
                    let dx = pos[0] - center[0];
                    let dy = pos[1] - center[1];
                    let dz = pos[2] - center[2];
                    (dx * dx + dy * dy + dz * dz).sqrt() <= radius
                }
            })
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|id| id as f64).collect()
    }

    fn apply_force(&mut self, entity: f64, force: [f64; 3]) {
        self.forces.push((entity, force));
    }

    fn set_hp(&mut self, entity: f64, hp: f64) {
        self.hp_changes.push((entity, hp));
    }

    fn raycast(&mut self, _origin: [f64; 3], _direction: [f64; 3]) -> Option<RayHit> {
        self.ray_hit
    }

    fn hack(&mut self, entity: f64, property: &str, value: f64) {
        self.hacks.push(HackRecord {
            entity,
            property: property.to_string(),
            value,
        });
    }

    fn emit(&mut self, value: f64) {
        tracing::debug!(target: "botvm::script", value, "print");
        self.emitted.push(value);
    }

    fn store(&mut self, slot: usize, value: f64) {
        if let Some(cell) = self.storage.get_mut(slot) {
            *cell = value;
        }
    }

    fn load(&mut self, slot: usize) -> f64 {
        self.storage.get(slot).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_filters_by_radius() {
        let mut world = MockWorld::new(1.0);
        world.place(1, [0.0, 0.0, 0.0]);
        world.place(2, [3.0, 4.0, 0.0]); // distance 5
        world.place(3, [30.0, 0.0, 0.0]); // distance 30

        assert_eq!(world.nearby(1.0, 10.0), vec![2.0]);
        assert_eq!(world.nearby(1.0, 50.0), vec![2.0, 3.0]);
        assert!(world.nearby(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_nearby_unknown_entity_is_empty() {
        let mut world = MockWorld::new(1.0);
        assert!(world.nearby(42.0, 100.0).is_empty());
    }

    #[test]
    fn test_storage_slots() {
        let mut world = MockWorld::new(1.0);
        world.store(0, 1.5);
        world.store(255, -2.0);
        assert_eq!(world.load(0), 1.5);
        assert_eq!(world.load(255), -2.0);
        assert_eq!(world.load(7), 0.0);

        // Out of range is a silent no-op / zero read
        world.store(256, 9.0);
        assert_eq!(world.load(256), 0.0);
    }
}
