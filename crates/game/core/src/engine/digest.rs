//! Canonical hash of the simulation state.

use sha2::{Digest, Sha256};

use crate::ecs::{Actor, Health, World};

/// SHA-256 over every live entity in ascending id order.
///
/// Each entity contributes its id, then a tagged position, health and energy
/// record. Absent components hash as a zero tag so that "missing" and
/// "zero-valued" stay distinct.
pub fn state_digest(world: &World) -> [u8; 32] {
    let mut hasher = Sha256::new();

    for id in world.entities() {
        hasher.update(id.0.to_le_bytes());

        match world.position(id) {
            Some(position) => {
                hasher.update([1]);
                hasher.update(position.x.to_le_bytes());
                hasher.update(position.y.to_le_bytes());
            }
            None => hasher.update([0]),
        }

        match world.get::<Health>(id) {
            Some(health) => {
                hasher.update([1]);
                hasher.update(health.hp.to_le_bytes());
                hasher.update(health.max.to_le_bytes());
            }
            None => hasher.update([0]),
        }

        match world.get::<Actor>(id) {
            Some(actor) => {
                hasher.update([1]);
                hasher.update(actor.energy.to_le_bytes());
            }
            None => hasher.update([0]),
        }
    }

    hasher.finalize().into()
}
