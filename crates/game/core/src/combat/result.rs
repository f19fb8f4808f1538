//! Attack categories and reports.

use crate::ecs::EntityId;

/// Narrative bucket of a resolved hit, used to pick message text.
///
/// A roll fully absorbed by armor is its own category: there is no miss in
/// melee, every attack connects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackCategory {
    Absorbed,
    Weak,
    Normal,
    Strong,
    Kill,
}

/// Everything one call to [`resolve_attack`](super::resolve_attack) computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    pub attacker: EntityId,
    pub target: EntityId,
    /// Raw roll before armor.
    pub roll: u32,
    pub damage: u32,
    pub hp_before: u32,
    pub hp_after: u32,
    pub category: AttackCategory,
    pub killed: bool,
}

/// Buckets `damage` as a fraction of the attacker's best roll.
///
/// `0` is absorbed and a lethal hit is a kill regardless of size; otherwise
/// `< 30%` is weak, `< 70%` normal, and anything above strong.
pub fn categorize(damage: u32, max_roll: u32, lethal: bool) -> AttackCategory {
    if damage == 0 {
        return AttackCategory::Absorbed;
    }
    if lethal {
        return AttackCategory::Kill;
    }

    let max_roll = max_roll.max(1);
    if damage * 10 < max_roll * 3 {
        AttackCategory::Weak
    } else if damage * 10 < max_roll * 7 {
        AttackCategory::Normal
    } else {
        AttackCategory::Strong
    }
}
