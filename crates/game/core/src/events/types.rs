use strum::{EnumCount, EnumDiscriminants};

use crate::combat::DamageType;
use crate::ecs::{EntityId, Position};

/// Packed `0xRRGGBB` colours used by message events.
pub mod colors {
    pub const WHITE: u32 = 0xFFFFFF;
    pub const GREY: u32 = 0x999999;
    pub const RED: u32 = 0xFF4444;
    pub const DARK_RED: u32 = 0xAA0000;
    pub const GREEN: u32 = 0x44FF44;
    pub const YELLOW: u32 = 0xFFFF44;
    pub const ORANGE: u32 = 0xFF8800;
    pub const CYAN: u32 = 0x44FFFF;
    pub const PURPLE: u32 = 0xAA44FF;
    pub const GOLD: u32 = 0xFFD700;
}

/// Timed condition carried by [`GameEvent::ApplyStatus`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffect {
    Poisoned,
    Stunned,
    Burning,
}

/// Every outcome the simulation reports to observers.
///
/// [`EventKind`] is the field-less tag used to register listeners.
#[derive(Clone, Debug, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKind))]
#[strum_discriminants(derive(Hash, EnumCount))]
#[cfg_attr(feature = "serde", strum_discriminants(derive(serde::Serialize, serde::Deserialize)))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    Moved {
        who: EntityId,
        from: Position,
        to: Position,
    },
    TookDamage {
        who: EntityId,
        amount: u32,
        damage_type: DamageType,
    },
    Died {
        who: EntityId,
        killer: Option<EntityId>,
        /// Captured before the killer might itself be destroyed.
        killer_name: Option<String>,
    },
    Healed {
        who: EntityId,
        amount: u32,
    },
    PickedItem {
        who: EntityId,
        item: EntityId,
    },
    Descend {
        who: EntityId,
    },
    ApplyStatus {
        who: EntityId,
        effect: StatusEffect,
        turns: u32,
    },
    Attack {
        attacker: EntityId,
        target: EntityId,
    },
    Message {
        text: String,
        color: u32,
    },
    FloorChanged {
        floor: u32,
    },
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        EventKind::from(self)
    }

    pub fn message(text: impl Into<String>, color: u32) -> Self {
        GameEvent::Message {
            text: text.into(),
            color,
        }
    }
}

impl EventKind {
    pub const COUNT: usize = <Self as EnumCount>::COUNT;

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}
