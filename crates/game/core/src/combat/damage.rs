//! Damage rolls and application.

use crate::ecs::Melee;
use crate::rng::GameRng;

/// Damage type carried by melee attacks and damage events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    /// Claws, blades, clubs.
    #[default]
    Physical,
    Fire,
    Cold,
    Poison,
}

/// Rolls a uniform integer in `[damage_min, damage_max]`; unarmed attackers deal 1.
pub fn roll_damage(melee: Option<&Melee>, rng: &mut GameRng) -> u32 {
    match melee {
        Some(melee) => rng.range(melee.damage_min, melee.damage_max),
        None => 1,
    }
}

/// Flat armor reduction, floored at zero.
///
/// ```text
/// damage = max(0, roll - armor)
/// ```
pub fn mitigate(roll: u32, armor: u32) -> u32 {
    roll.saturating_sub(armor)
}

/// New HP value after damage (clamped to 0).
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_never_heals() {
        assert_eq!(mitigate(2, 5), 0);
        assert_eq!(mitigate(4, 1), 3);
    }

    #[test]
    fn hp_is_clamped_at_zero() {
        assert_eq!(apply_damage(3, 10), 0);
        assert_eq!(apply_damage(10, 3), 7);
    }
}
